//! Domain models for isp-portal-service.

mod account;
mod accounting;
mod package;
mod portal_user;
mod profile_view;
mod ticket;
mod transaction;
mod usage;

pub use account::{AccountStatus, ClientAccount, UpdateContactDetails};
pub use accounting::AccountingSession;
pub use package::PackagePlan;
pub use portal_user::{NewPortalUser, PortalProfile, PortalUser};
pub use profile_view::{DashboardSection, IspProfileView, PackageStatus};
pub use ticket::{NewTicket, Ticket, TicketPriority, TicketStatus};
pub use transaction::{ClientTransaction, PaymentMethod, TransactionStatus, TransactionType};
pub use usage::{UsageStats, UsageWindow};
