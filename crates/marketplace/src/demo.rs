//! Demo marketplace used by the CLI and the integration tests.
//!
//! Everything goes through the public store API, so seeding exercises the
//! same lifecycle guards as real traffic.

use crate::models::*;
use crate::store::MarketplaceStore;
use creator_trust_core::MarketplaceResult;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct DemoSummary {
    pub brand_users: Vec<Uuid>,
    pub creator_users: Vec<Uuid>,
    pub campaigns: Vec<Uuid>,
    pub payments_escrowed: u64,
    pub payments_released: u64,
    pub reviews: u64,
}

/// How far a demo campaign is driven. Indexes point into the creator list.
enum Stage {
    Open,
    Assigned(usize),
    Submitted(usize),
    Completed(usize, u8),
}

const DEMO_PASSWORD_HASH: &str = "$demo$not-a-real-hash";

pub fn seed_demo_data(store: &MarketplaceStore) -> MarketplaceResult<DemoSummary> {
    let brands = [
        ("team@glowlabs.example", "Glow Labs", "Beauty", Some("https://glowlabs.example"), "Clean skincare for every skin type"),
        ("hello@peakfuel.example", "PeakFuel", "Sports Nutrition", None, "Fuel for trail and gym"),
    ];
    let creators = [
        ("ava@creators.example", "Ava Chen", "beauty", "Los Angeles", Some("@avaglow"), None, Some("@ava.tok"), 48_000, 0, 120_000, 0.064),
        ("marcus@creators.example", "Marcus Reid", "fitness", "Denver", Some("@marcusruns"), Some("MarcusReidRuns"), None, 22_500, 61_000, 0, 0.051),
        ("lena@creators.example", "Lena Ortiz", "fitness", "Austin", None, None, Some("@lenalifts"), 0, 0, 9_800, 0.093),
    ];

    let mut brand_users = Vec::new();
    let mut brand_ids = Vec::new();
    for (email, company, industry, website, description) in brands {
        let user = store.create_user(email, DEMO_PASSWORD_HASH, UserRole::Brand)?;
        let profile = store.create_brand_profile(
            user.id,
            NewBrandProfile {
                company_name: company.to_string(),
                industry: industry.to_string(),
                website: website.map(str::to_string),
                description: description.to_string(),
            },
        )?;
        brand_users.push(user.id);
        brand_ids.push(profile.id);
    }

    let mut creator_users = Vec::new();
    let mut creator_ids = Vec::new();
    for (email, name, niche, location, ig, yt, tt, ig_count, yt_count, tt_count, engagement) in creators {
        let user = store.create_user(email, DEMO_PASSWORD_HASH, UserRole::Creator)?;
        let profile = store.create_creator_profile(
            user.id,
            NewCreatorProfile {
                name: name.to_string(),
                bio: format!("{niche} creator based in {location}"),
                niche: niche.to_string(),
                location: location.to_string(),
                instagram_handle: ig.map(str::to_string),
                youtube_handle: yt.map(str::to_string),
                tiktok_handle: tt.map(str::to_string),
            },
        )?;
        store.update_creator_profile(
            user.id,
            CreatorProfileUpdate {
                followers_instagram: Some(ig_count),
                followers_youtube: Some(yt_count),
                followers_tiktok: Some(tt_count),
                engagement_rate: Some(engagement),
                ..Default::default()
            },
        );
        creator_users.push(user.id);
        creator_ids.push(profile.id);
    }

    let campaigns = [
        (0, "Summer Glow Serum", "beauty", 1500.0, 14, &["instagram", "tiktok"][..], Stage::Completed(0, 5)),
        (1, "Trail Running Launch", "fitness", 2500.0, 21, &["youtube"][..], Stage::Completed(1, 4)),
        (1, "Protein Bar Taste Test", "fitness", 800.0, 7, &["instagram"][..], Stage::Completed(1, 5)),
        (0, "Holiday Lookbook", "beauty", 1200.0, 30, &["instagram"][..], Stage::Submitted(0)),
        (1, "Home Gym Setup", "fitness", 600.0, 10, &["tiktok"][..], Stage::Assigned(2)),
        (0, "Skincare Routine Series", "beauty", 2000.0, 45, &["youtube", "instagram"][..], Stage::Open),
    ];

    let mut campaign_ids = Vec::new();
    let mut payments_escrowed = 0;
    let mut payments_released = 0;
    let mut reviews = 0;
    for (brand, title, niche, budget, days, platforms, stage) in campaigns {
        let campaign = store.create_campaign(
            brand_ids[brand],
            NewCampaign {
                title: title.to_string(),
                description: format!("{title} campaign"),
                budget,
                platforms: platforms.iter().map(|p| p.to_string()).collect(),
                duration_days: days,
                niche: niche.to_string(),
                min_followers: 5_000,
                content_requirements: "Disclose the partnership in every post".to_string(),
            },
        )?;
        campaign_ids.push(campaign.id);

        let (creator, rating) = match stage {
            Stage::Open => continue,
            Stage::Assigned(c) | Stage::Submitted(c) => (c, None),
            Stage::Completed(c, r) => (c, Some(r)),
        };

        store.create_payment(campaign.id, budget)?;
        store.assign_campaign(campaign.id, creator_ids[creator])?;
        if matches!(stage, Stage::Assigned(_)) {
            payments_escrowed += 1;
            continue;
        }

        store.submit_campaign(
            campaign.id,
            NewSubmission {
                content_links: vec![format!("https://content.example/{}", campaign.id.simple())],
                notes: "Posted on schedule".to_string(),
            },
        )?;
        let views = (budget * 40.0) as u64;
        store.record_submission_metrics(
            campaign.id,
            SubmissionMetrics { views, likes: views / 12, comments: views / 150, engagement_rate: 0.09 },
        );

        match rating {
            Some(rating) => {
                store.approve_campaign(campaign.id)?;
                store.create_review(
                    campaign.id,
                    NewReview { rating, comment: format!("{title} delivered as promised") },
                )?;
                payments_released += 1;
                reviews += 1;
            }
            None => payments_escrowed += 1,
        }
    }

    info!(
        brands = brand_users.len(),
        creators = creator_users.len(),
        campaigns = campaign_ids.len(),
        "Demo data seeded"
    );

    Ok(DemoSummary {
        brand_users,
        creator_users,
        campaigns: campaign_ids,
        payments_escrowed,
        payments_released,
        reviews,
    })
}
