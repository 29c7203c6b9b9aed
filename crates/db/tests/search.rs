//! Integration tests for campaign-scoped substring and tag search.

use questlog_core::search::{contains_pattern, RESULTS_PER_TYPE};
use questlog_db::models::campaign::CreateCampaign;
use questlog_db::models::character::CreateCharacter;
use questlog_db::models::note::CreateNote;
use questlog_db::models::user::ProvisionUser;
use questlog_db::repositories::{CampaignRepo, CharacterRepo, NoteRepo, SearchRepo, UserRepo};
use sqlx::PgPool;

async fn seed_campaign(pool: &PgPool, subject: &str) -> questlog_db::models::campaign::Campaign {
    let user = UserRepo::provision(
        pool,
        &ProvisionUser {
            subject: subject.to_string(),
            email: format!("{subject}@example.com"),
            display_name: subject.to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap();
    CampaignRepo::create(
        pool,
        user.id,
        &CreateCampaign {
            name: "Search fixtures".to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
}

fn character(name: &str, description: &str, tags: Option<Vec<String>>) -> CreateCharacter {
    CreateCharacter {
        name: name.to_string(),
        kind: None,
        race: None,
        class: None,
        location_id: None,
        description: Some(description.to_string()),
        tags,
    }
}

#[sqlx::test]
async fn substring_match_hits_only_the_matching_entity(pool: PgPool) {
    let campaign = seed_campaign(&pool, "searcher").await;

    CharacterRepo::create(
        &pool,
        campaign.id,
        &character("Strahd", "Rules from castle Ravenloft", None),
    )
    .await
    .unwrap();
    CharacterRepo::create(&pool, campaign.id, &character("Ireena", "A kind soul", None))
        .await
        .unwrap();
    NoteRepo::create(
        &pool,
        campaign.id,
        &CreateNote {
            title: "Shopping list".to_string(),
            content: Some("rope, torches".to_string()),
            tags: None,
        },
    )
    .await
    .unwrap();

    let pattern = contains_pattern("ravenloft").unwrap();
    let results = SearchRepo::search_text(&pool, campaign.id, &pattern).await.unwrap();

    assert_eq!(results.characters.len(), 1);
    assert_eq!(results.characters[0].name, "Strahd");
    assert!(results.notes.is_empty());
    assert!(results.locations.is_empty());
    assert_eq!(results.total(), 1);
}

#[sqlx::test]
async fn search_does_not_leak_across_campaigns(pool: PgPool) {
    let mine = seed_campaign(&pool, "me").await;
    let theirs = seed_campaign(&pool, "them").await;

    CharacterRepo::create(
        &pool,
        theirs.id,
        &character("Secret villain", "hidden agenda", None),
    )
    .await
    .unwrap();

    let pattern = contains_pattern("hidden").unwrap();
    let results = SearchRepo::search_text(&pool, mine.id, &pattern).await.unwrap();
    assert_eq!(results.total(), 0);
}

#[sqlx::test]
async fn like_wildcards_in_queries_match_literally(pool: PgPool) {
    let campaign = seed_campaign(&pool, "wildcards").await;

    CharacterRepo::create(&pool, campaign.id, &character("Percent", "done 50% through", None))
        .await
        .unwrap();
    CharacterRepo::create(&pool, campaign.id, &character("Other", "done 50 percent", None))
        .await
        .unwrap();

    // An unescaped "50%" would match both rows; escaped it matches one.
    let pattern = contains_pattern("50%").unwrap();
    let results = SearchRepo::search_text(&pool, campaign.id, &pattern).await.unwrap();
    assert_eq!(results.characters.len(), 1);
    assert_eq!(results.characters[0].name, "Percent");
}

#[sqlx::test]
async fn per_type_results_are_capped(pool: PgPool) {
    let campaign = seed_campaign(&pool, "capped").await;

    for i in 0..(RESULTS_PER_TYPE + 5) {
        CharacterRepo::create(
            &pool,
            campaign.id,
            &character(&format!("Cultist {i}"), "a faceless cultist", None),
        )
        .await
        .unwrap();
    }

    let pattern = contains_pattern("cultist").unwrap();
    let results = SearchRepo::search_text(&pool, campaign.id, &pattern).await.unwrap();
    assert_eq!(results.characters.len(), RESULTS_PER_TYPE as usize);
}

#[sqlx::test]
async fn tag_search_returns_matching_entities(pool: PgPool) {
    let campaign = seed_campaign(&pool, "tagged").await;

    CharacterRepo::create(
        &pool,
        campaign.id,
        &character("Strahd", "", Some(vec!["undead".to_string(), "noble".to_string()])),
    )
    .await
    .unwrap();
    CharacterRepo::create(
        &pool,
        campaign.id,
        &character("Ireena", "", Some(vec!["noble".to_string()])),
    )
    .await
    .unwrap();
    NoteRepo::create(
        &pool,
        campaign.id,
        &CreateNote {
            title: "Vampire lore".to_string(),
            content: None,
            tags: Some(vec!["undead".to_string()]),
        },
    )
    .await
    .unwrap();

    let results = SearchRepo::search_tag(&pool, campaign.id, "undead").await.unwrap();
    assert_eq!(results.characters.len(), 1);
    assert_eq!(results.characters[0].name, "Strahd");
    assert_eq!(results.notes.len(), 1);
    assert_eq!(results.total(), 2);

    let nothing = SearchRepo::search_tag(&pool, campaign.id, "fey").await.unwrap();
    assert_eq!(nothing.total(), 0);
}
