//! Profile and notification preference commands.

use clap::{Args, Subcommand, ValueEnum};

use threadline_portal::Portal;
use threadline_portal::models::{NotificationPreferences, ProfileUpdate};

use super::{CliError, Login};

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// Brand accounts only
    #[arg(long)]
    website: Option<String>,
    /// Brand accounts only
    #[arg(long)]
    industry: Option<String>,
    /// Brand accounts only
    #[arg(long)]
    company_size: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Channel {
    EmailOrders,
    EmailMarketing,
    EmailQuotes,
    EmailProjects,
    SmsOrders,
    SmsQuotes,
    SmsMarketing,
}

impl Channel {
    fn slot(self, prefs: &mut NotificationPreferences) -> &mut bool {
        match self {
            Self::EmailOrders => &mut prefs.email_orders,
            Self::EmailMarketing => &mut prefs.email_marketing,
            Self::EmailQuotes => &mut prefs.email_quotes,
            Self::EmailProjects => &mut prefs.email_projects,
            Self::SmsOrders => &mut prefs.sms_orders,
            Self::SmsQuotes => &mut prefs.sms_quotes,
            Self::SmsMarketing => &mut prefs.sms_marketing,
        }
    }
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Show your profile
    Profile,
    /// Create or update your profile
    SetProfile(ProfileArgs),
    /// Show notification preferences
    Prefs,
    /// Turn one notification channel on or off
    SetPref {
        channel: Channel,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

pub async fn run(portal: &Portal, login: &Login, action: AccountAction) -> Result<(), CliError> {
    let identity = login.establish(portal).await?;
    let account = portal.account();

    match action {
        AccountAction::Profile => match account.profile(identity.user_id).await? {
            Some(profile) => {
                println!("name:    {}", profile.name);
                println!("phone:   {}", profile.phone.unwrap_or_default());
                if let Some(website) = profile.website {
                    println!("website: {website}");
                }
                if let Some(industry) = profile.industry {
                    println!("industry: {industry}");
                }
                if let Some(size) = profile.company_size {
                    println!("company size: {size}");
                }
            }
            None => println!("No profile saved yet"),
        },
        AccountAction::SetProfile(args) => {
            let update = ProfileUpdate {
                name: args.name,
                phone: args.phone,
                website: args.website,
                industry: args.industry,
                company_size: args.company_size,
            };
            let profile = account.save_profile(identity.user_id, update).await?;
            println!("Profile #{} saved", profile.id);
        }
        AccountAction::Prefs => {
            let prefs = account.notification_preferences(identity.user_id).await?;
            print_prefs(&prefs);
        }
        AccountAction::SetPref { channel, enabled } => {
            let mut prefs = account.notification_preferences(identity.user_id).await?;
            *channel.slot(&mut prefs) = enabled;
            let saved = account.save_notification_preferences(&prefs).await?;
            print_prefs(&saved);
        }
    }
    Ok(())
}

fn print_prefs(prefs: &NotificationPreferences) {
    let rows = [
        ("email-orders", prefs.email_orders),
        ("email-marketing", prefs.email_marketing),
        ("email-quotes", prefs.email_quotes),
        ("email-projects", prefs.email_projects),
        ("sms-orders", prefs.sms_orders),
        ("sms-quotes", prefs.sms_quotes),
        ("sms-marketing", prefs.sms_marketing),
    ];
    for (name, on) in rows {
        println!("{name:<16} {}", if on { "on" } else { "off" });
    }
}
