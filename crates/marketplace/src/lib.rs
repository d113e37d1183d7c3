//! Creator marketplace domain store: brands post paid campaigns, creators
//! deliver content, payments sit in escrow until the brand approves.
//!
//! State lives in DashMap (in-process); the store is shared by `Arc`.

pub mod dashboard;
pub mod demo;
pub mod models;
pub mod store;

pub use dashboard::{
    BrandAnalytics, BrandDashboard, CampaignAnalytics, CampaignDetail, CreatorAnalytics,
    CreatorDashboard,
};
pub use demo::{seed_demo_data, DemoSummary};
pub use store::MarketplaceStore;
