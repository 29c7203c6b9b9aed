//! Integration tests for entity CRUD against a real database:
//! - Create the full campaign hierarchy
//! - Owner scoping on campaign queries
//! - Cascade delete behaviour
//! - Unique / check constraint violations on relationships
//! - Parent-location deletion nulls children

use questlog_db::models::campaign::{CreateCampaign, UpdateCampaign};
use questlog_db::models::character::{CreateCharacter, UpdateCharacter};
use questlog_db::models::dice_roll::CreateDiceRoll;
use questlog_db::models::item::CreateItem;
use questlog_db::models::location::CreateLocation;
use questlog_db::models::map::CreateMap;
use questlog_db::models::note::CreateNote;
use questlog_db::models::quest::CreateQuest;
use questlog_db::models::relationship::CreateRelationship;
use questlog_db::models::timeline_event::CreateTimelineEvent;
use questlog_db::models::user::ProvisionUser;
use questlog_db::repositories::{
    CampaignRepo, CharacterRepo, DiceRollRepo, ItemRepo, LocationRepo, MapRepo, NoteRepo,
    QuestRepo, RelationshipRepo, TimelineEventRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, subject: &str) -> questlog_db::models::user::User {
    UserRepo::provision(
        pool,
        &ProvisionUser {
            subject: subject.to_string(),
            email: format!("{subject}@example.com"),
            display_name: subject.to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap()
}

fn new_campaign(name: &str) -> CreateCampaign {
    CreateCampaign {
        name: name.to_string(),
        description: None,
    }
}

fn new_character(name: &str) -> CreateCharacter {
    CreateCharacter {
        name: name.to_string(),
        kind: None,
        race: None,
        class: None,
        location_id: None,
        description: None,
        tags: None,
    }
}

fn new_location(name: &str) -> CreateLocation {
    CreateLocation {
        name: name.to_string(),
        kind: None,
        parent_id: None,
        description: None,
        tags: None,
    }
}

// ---------------------------------------------------------------------------
// Test: full hierarchy creation
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn create_full_hierarchy(pool: PgPool) {
    let user = seed_user(&pool, "gm-hierarchy").await;
    let campaign = CampaignRepo::create(&pool, user.id, &new_campaign("Curse of Strahd"))
        .await
        .unwrap();
    assert_eq!(campaign.user_id, user.id);
    assert_eq!(campaign.name, "Curse of Strahd");

    let village = LocationRepo::create(&pool, campaign.id, &new_location("Barovia Village"))
        .await
        .unwrap();
    assert_eq!(village.campaign_id, campaign.id);

    let mut strahd = new_character("Strahd");
    strahd.kind = Some("villain".to_string());
    strahd.location_id = Some(village.id);
    let strahd = CharacterRepo::create(&pool, campaign.id, &strahd).await.unwrap();
    assert_eq!(strahd.kind, "villain");
    assert_eq!(strahd.location_id, Some(village.id));

    let ireena = CharacterRepo::create(&pool, campaign.id, &new_character("Ireena"))
        .await
        .unwrap();
    // Kind defaults to npc when omitted.
    assert_eq!(ireena.kind, "npc");

    let item = ItemRepo::create(
        &pool,
        campaign.id,
        &CreateItem {
            name: "Sunsword".to_string(),
            kind: Some("weapon".to_string()),
            owner_id: Some(ireena.id),
            location_id: None,
            description: None,
            tags: Some(vec!["artifact".to_string()]),
        },
    )
    .await
    .unwrap();
    assert_eq!(item.owner_id, Some(ireena.id));
    assert_eq!(item.tags.0, vec!["artifact"]);

    let note = NoteRepo::create(
        &pool,
        campaign.id,
        &CreateNote {
            title: "Session 0".to_string(),
            content: Some("House rules".to_string()),
            tags: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(note.tags.0, Vec::<String>::new());

    let rel = RelationshipRepo::create(
        &pool,
        campaign.id,
        &CreateRelationship {
            from_id: strahd.id,
            to_id: ireena.id,
            kind: Some("obsession".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(rel.from_id, strahd.id);

    let event = TimelineEventRepo::create(
        &pool,
        campaign.id,
        &CreateTimelineEvent {
            title: "Arrival in Barovia".to_string(),
            event_date: Some("1st of Mirtul".to_string()),
            session_number: Some(1),
            kind: Some("travel".to_string()),
            character_ids: Some(vec![strahd.id, ireena.id]),
            location_ids: Some(vec![village.id]),
            description: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(event.character_ids.0.len(), 2);

    let quest = QuestRepo::create(
        &pool,
        campaign.id,
        &CreateQuest {
            title: "Find the Sunsword".to_string(),
            status: None,
            giver_id: Some(ireena.id),
            description: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    // Status defaults to open when omitted.
    assert_eq!(quest.status, "open");

    let map = MapRepo::create(
        &pool,
        campaign.id,
        &CreateMap {
            name: "Village overview".to_string(),
            image_url: None,
            location_id: Some(village.id),
            description: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(map.location_id, Some(village.id));

    let roll = DiceRollRepo::create(
        &pool,
        campaign.id,
        &CreateDiceRoll {
            character_id: Some(ireena.id),
            expression: "2d6+1".to_string(),
            rolls: vec![3, 5],
            modifier: 1,
            total: 9,
            purpose: "initiative".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(roll.rolls.0, vec![3, 5]);
    assert_eq!(roll.total, 9);
}

// ---------------------------------------------------------------------------
// Test: owner scoping
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn campaigns_are_scoped_to_their_owner(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    let campaign = CampaignRepo::create(&pool, alice.id, &new_campaign("Alice's game"))
        .await
        .unwrap();

    // Owner sees it.
    assert!(CampaignRepo::find_for_user(&pool, campaign.id, alice.id)
        .await
        .unwrap()
        .is_some());

    // Anyone else does not.
    assert!(CampaignRepo::find_for_user(&pool, campaign.id, bob.id)
        .await
        .unwrap()
        .is_none());

    // Nor can they update or delete it.
    let update = UpdateCampaign {
        name: Some("Hijacked".to_string()),
        description: None,
    };
    assert!(CampaignRepo::update(&pool, campaign.id, bob.id, &update)
        .await
        .unwrap()
        .is_none());
    assert!(!CampaignRepo::delete(&pool, campaign.id, bob.id).await.unwrap());

    assert_eq!(CampaignRepo::list_for_user(&pool, bob.id, 50, 0).await.unwrap().len(), 0);
    assert_eq!(CampaignRepo::list_for_user(&pool, alice.id, 50, 0).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: cascade delete
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn campaign_delete_cascades_to_all_children(pool: PgPool) {
    let user = seed_user(&pool, "gm-cascade").await;
    let campaign = CampaignRepo::create(&pool, user.id, &new_campaign("Doomed"))
        .await
        .unwrap();

    let location = LocationRepo::create(&pool, campaign.id, &new_location("Keep"))
        .await
        .unwrap();
    let a = CharacterRepo::create(&pool, campaign.id, &new_character("A")).await.unwrap();
    let b = CharacterRepo::create(&pool, campaign.id, &new_character("B")).await.unwrap();
    let item = ItemRepo::create(
        &pool,
        campaign.id,
        &CreateItem {
            name: "Lantern".to_string(),
            kind: None,
            owner_id: None,
            location_id: None,
            description: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    let note = NoteRepo::create(
        &pool,
        campaign.id,
        &CreateNote {
            title: "N".to_string(),
            content: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    let rel = RelationshipRepo::create(
        &pool,
        campaign.id,
        &CreateRelationship {
            from_id: a.id,
            to_id: b.id,
            kind: None,
            description: None,
        },
    )
    .await
    .unwrap();
    let event = TimelineEventRepo::create(
        &pool,
        campaign.id,
        &CreateTimelineEvent {
            title: "E".to_string(),
            event_date: None,
            session_number: None,
            kind: None,
            character_ids: None,
            location_ids: None,
            description: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    let quest = QuestRepo::create(
        &pool,
        campaign.id,
        &CreateQuest {
            title: "Q".to_string(),
            status: None,
            giver_id: None,
            description: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    let map = MapRepo::create(
        &pool,
        campaign.id,
        &CreateMap {
            name: "M".to_string(),
            image_url: None,
            location_id: None,
            description: None,
            tags: None,
        },
    )
    .await
    .unwrap();
    let roll = DiceRollRepo::create(
        &pool,
        campaign.id,
        &CreateDiceRoll {
            character_id: None,
            expression: "1d20".to_string(),
            rolls: vec![17],
            modifier: 0,
            total: 17,
            purpose: String::new(),
        },
    )
    .await
    .unwrap();

    let deleted = CampaignRepo::delete(&pool, campaign.id, user.id).await.unwrap();
    assert!(deleted);

    // Every child row must be gone.
    assert!(LocationRepo::find_by_id(&pool, campaign.id, location.id).await.unwrap().is_none());
    assert!(CharacterRepo::find_by_id(&pool, campaign.id, a.id).await.unwrap().is_none());
    assert!(ItemRepo::find_by_id(&pool, campaign.id, item.id).await.unwrap().is_none());
    assert!(NoteRepo::find_by_id(&pool, campaign.id, note.id).await.unwrap().is_none());
    assert!(RelationshipRepo::find_by_id(&pool, campaign.id, rel.id).await.unwrap().is_none());
    assert!(TimelineEventRepo::find_by_id(&pool, campaign.id, event.id).await.unwrap().is_none());
    assert!(QuestRepo::find_by_id(&pool, campaign.id, quest.id).await.unwrap().is_none());
    assert!(MapRepo::find_by_id(&pool, campaign.id, map.id).await.unwrap().is_none());
    assert!(DiceRollRepo::find_by_id(&pool, campaign.id, roll.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: relationship constraints
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn duplicate_relationship_pair_is_rejected(pool: PgPool) {
    let user = seed_user(&pool, "gm-rel").await;
    let campaign = CampaignRepo::create(&pool, user.id, &new_campaign("Edges"))
        .await
        .unwrap();
    let a = CharacterRepo::create(&pool, campaign.id, &new_character("A")).await.unwrap();
    let b = CharacterRepo::create(&pool, campaign.id, &new_character("B")).await.unwrap();

    let edge = CreateRelationship {
        from_id: a.id,
        to_id: b.id,
        kind: None,
        description: None,
    };
    RelationshipRepo::create(&pool, campaign.id, &edge).await.unwrap();

    let result = RelationshipRepo::create(&pool, campaign.id, &edge).await;
    assert!(result.is_err(), "duplicate (from,to) pair should fail");

    // Reverse direction is a different edge and must succeed.
    let reverse = CreateRelationship {
        from_id: b.id,
        to_id: a.id,
        kind: None,
        description: None,
    };
    RelationshipRepo::create(&pool, campaign.id, &reverse).await.unwrap();
}

#[sqlx::test]
async fn self_relationship_violates_check_constraint(pool: PgPool) {
    let user = seed_user(&pool, "gm-self").await;
    let campaign = CampaignRepo::create(&pool, user.id, &new_campaign("Loops"))
        .await
        .unwrap();
    let a = CharacterRepo::create(&pool, campaign.id, &new_character("A")).await.unwrap();

    let result = RelationshipRepo::create(
        &pool,
        campaign.id,
        &CreateRelationship {
            from_id: a.id,
            to_id: a.id,
            kind: None,
            description: None,
        },
    )
    .await;
    assert!(result.is_err(), "self edge should violate the check constraint");
}

#[sqlx::test]
async fn character_delete_cascades_relationships(pool: PgPool) {
    let user = seed_user(&pool, "gm-chardel").await;
    let campaign = CampaignRepo::create(&pool, user.id, &new_campaign("Grief"))
        .await
        .unwrap();
    let a = CharacterRepo::create(&pool, campaign.id, &new_character("A")).await.unwrap();
    let b = CharacterRepo::create(&pool, campaign.id, &new_character("B")).await.unwrap();

    let rel = RelationshipRepo::create(
        &pool,
        campaign.id,
        &CreateRelationship {
            from_id: a.id,
            to_id: b.id,
            kind: None,
            description: None,
        },
    )
    .await
    .unwrap();

    CharacterRepo::delete(&pool, campaign.id, a.id).await.unwrap();

    assert!(RelationshipRepo::find_by_id(&pool, campaign.id, rel.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: location tree
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn parent_location_delete_nulls_children(pool: PgPool) {
    let user = seed_user(&pool, "gm-tree").await;
    let campaign = CampaignRepo::create(&pool, user.id, &new_campaign("Geography"))
        .await
        .unwrap();

    let valley = LocationRepo::create(&pool, campaign.id, &new_location("Valley"))
        .await
        .unwrap();
    let mut village = new_location("Village");
    village.parent_id = Some(valley.id);
    let village = LocationRepo::create(&pool, campaign.id, &village).await.unwrap();
    assert_eq!(village.parent_id, Some(valley.id));

    LocationRepo::delete(&pool, campaign.id, valley.id).await.unwrap();

    let orphan = LocationRepo::find_by_id(&pool, campaign.id, village.id)
        .await
        .unwrap()
        .expect("child must survive parent deletion");
    assert_eq!(orphan.parent_id, None);
}

#[sqlx::test]
async fn location_delete_nulls_character_refs(pool: PgPool) {
    let user = seed_user(&pool, "gm-locref").await;
    let campaign = CampaignRepo::create(&pool, user.id, &new_campaign("Homes"))
        .await
        .unwrap();
    let keep = LocationRepo::create(&pool, campaign.id, &new_location("Keep"))
        .await
        .unwrap();

    let mut guard = new_character("Guard");
    guard.location_id = Some(keep.id);
    let guard = CharacterRepo::create(&pool, campaign.id, &guard).await.unwrap();

    LocationRepo::delete(&pool, campaign.id, keep.id).await.unwrap();

    let guard = CharacterRepo::find_by_id(&pool, campaign.id, guard.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(guard.location_id, None);
}

// ---------------------------------------------------------------------------
// Test: partial updates
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn update_applies_only_provided_fields(pool: PgPool) {
    let user = seed_user(&pool, "gm-update").await;
    let campaign = CampaignRepo::create(&pool, user.id, &new_campaign("Edits"))
        .await
        .unwrap();

    let mut input = new_character("Ismark");
    input.race = Some("human".to_string());
    input.class = Some("fighter".to_string());
    let character = CharacterRepo::create(&pool, campaign.id, &input).await.unwrap();

    let updated = CharacterRepo::update(
        &pool,
        campaign.id,
        character.id,
        &UpdateCharacter {
            name: None,
            kind: Some("ally".to_string()),
            race: None,
            class: None,
            location_id: None,
            description: None,
            tags: None,
        },
    )
    .await
    .unwrap()
    .expect("character exists");

    assert_eq!(updated.kind, "ally");
    assert_eq!(updated.name, "Ismark");
    assert_eq!(updated.race, "human");
    assert_eq!(updated.class, "fighter");
}

#[sqlx::test]
async fn user_provision_is_idempotent_per_subject(pool: PgPool) {
    let first = seed_user(&pool, "returning-gm").await;
    let again = UserRepo::provision(
        &pool,
        &ProvisionUser {
            subject: "returning-gm".to_string(),
            email: "new-address@example.com".to_string(),
            display_name: "Returning GM".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap();

    // Same row, refreshed profile.
    assert_eq!(first.id, again.id);
    assert_eq!(again.email, "new-address@example.com");
    assert_eq!(again.display_name, "Returning GM");
}
