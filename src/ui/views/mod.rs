mod company_detail;
mod company_list;
mod entity_list;
mod statistics;
mod wallet_requests;

pub use company_detail::CompanyDetailView;
pub use company_list::CompanyListView;
pub use entity_list::{
  offers_view, payments_view, plans_view, professionals_view, users_view, wallet_history_view,
  EntityListView,
};
pub use statistics::StatisticsView;
pub use wallet_requests::WalletRequestsView;
