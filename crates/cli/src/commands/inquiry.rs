//! Quote inquiry commands for both dashboards.

use clap::Subcommand;

use threadline_core::{InquiryId, InquiryStatus, Role, StatusGroup};
use threadline_portal::Portal;
use threadline_portal::inquiries::{InquiryDraft, LoadState};
use threadline_portal::session::View;

use super::{CliError, Login};

#[derive(Subcommand)]
pub enum InquiryAction {
    /// Submit a quote request
    Submit {
        #[arg(short, long)]
        description: String,

        #[arg(short, long)]
        quantity: String,

        /// Delivery date, `YYYY-MM-DD`
        #[arg(long)]
        deadline: String,

        #[arg(short, long, default_value = "")]
        fabrics: String,
    },
    /// List inquiries, newest first
    List {
        /// `all`, `pending` (includes in review), or an exact status
        #[arg(short, long, default_value = "all")]
        group: StatusGroup,

        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Every user's inquiries (brand only)
        #[arg(long)]
        all: bool,
    },
    /// Dashboard counters
    Stats {
        /// Every user's inquiries (brand only)
        #[arg(long)]
        all: bool,
    },
    /// Move an inquiry to a new status (brand only)
    Status { id: InquiryId, status: String },
    /// Ask the recommender for fabric suggestions
    Suggest {
        #[arg(short, long)]
        description: String,

        #[arg(short, long)]
        quantity: Option<u32>,

        #[arg(short, long)]
        fabrics: Option<String>,
    },
}

pub async fn run(portal: &Portal, login: &Login, action: InquiryAction) -> Result<(), CliError> {
    let service = portal.inquiries();

    match action {
        InquiryAction::Submit {
            description,
            quantity,
            deadline,
            fabrics,
        } => {
            let identity = login.open(portal, View::QuoteRequest).await?;
            let draft = InquiryDraft {
                description,
                quantity,
                deadline,
                fabrics,
            };
            let created = service.create(identity.user_id, &draft).await?;
            println!("Inquiry #{} submitted ({})", created.id, created.status);
        }
        InquiryAction::List { group, page, all } => {
            let board = load_board(portal, login, all).await?;
            let snapshot = board.with(|board| {
                board.set_group(group);
                board.set_page(page);
                board.clone()
            });
            if let LoadState::Failed(message) = snapshot.state() {
                println!("{message}");
                return Ok(());
            }
            for inquiry in snapshot.visible() {
                println!(
                    "#{:<5} {:<11} {:>6} due {}  {}",
                    inquiry.id,
                    inquiry.status.as_str(),
                    inquiry.quantity,
                    inquiry.deadline,
                    inquiry.description
                );
            }
            println!(
                "page {}/{} ({} matching {})",
                snapshot.page(),
                snapshot.page_count(),
                snapshot.filtered().len(),
                snapshot.group()
            );
        }
        InquiryAction::Stats { all } => {
            let snapshot = load_board(portal, login, all).await?.snapshot();
            if let LoadState::Failed(message) = snapshot.state() {
                println!("{message}");
                return Ok(());
            }
            let stats = snapshot.stats();
            println!("total:         {}", stats.total);
            println!("pending:       {}", stats.pending);
            println!("approved:      {}", stats.approved);
            println!("in production: {}", stats.in_production);
            println!("completed:     {}", stats.completed);
            println!("rejected:      {}", stats.rejected);
        }
        InquiryAction::Status { id, status } => {
            login.open(portal, View::BrandDashboard).await?;
            let updated = service
                .update_status(id, InquiryStatus::from(status))
                .await?;
            let next = updated
                .status
                .next()
                .map_or_else(|| "none".to_owned(), |s| s.to_string());
            println!(
                "Inquiry #{} is now {} (next step: {next})",
                updated.id, updated.status
            );
        }
        InquiryAction::Suggest {
            description,
            quantity,
            fabrics,
        } => {
            let Some(recommender) = portal.recommender() else {
                println!("No recommender configured (set THREADLINE_RECOMMENDER_URL)");
                return Ok(());
            };
            let suggestion = recommender
                .suggest(&description, quantity, fabrics.as_deref())
                .await
                .map_err(threadline_portal::PortalError::from)?;
            if let Some(summary) = &suggestion.summary {
                println!("{summary}");
            }
            for fabric in &suggestion.fabrics {
                println!("  - {fabric}");
            }
        }
    }
    Ok(())
}

/// Fetch inquiries into a fresh board: the user's own, or everyone's for a
/// brand asking with `--all`.
async fn load_board(
    portal: &Portal,
    login: &Login,
    all: bool,
) -> Result<threadline_portal::inquiries::SharedInquiryBoard, CliError> {
    let identity = if all {
        login.open(portal, View::BrandDashboard).await?
    } else {
        login.establish(portal).await?
    };
    let scope = match (all, identity.role) {
        (true, Role::Brand) => None,
        _ => Some(identity.user_id),
    };

    let board = portal.new_inquiry_board();
    board.refresh(&portal.inquiries(), scope).await;
    Ok(board)
}
