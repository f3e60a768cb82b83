use chrono::Utc;
use portfolio_admin::domain::category::{Category, NewCategory};
use portfolio_admin::domain::message::NewMessage;
use portfolio_admin::domain::project::{NewMedia, NewProject};
use portfolio_admin::domain::review::NewReview;
use portfolio_admin::domain::types::{
    CategoryId, CategoryName, EmailAddress, MediaKind, MediaUrl, MessageBody, PersonName,
    ProjectTitle, Rating, ReviewBody, ReviewStatus, Sequence, Technology,
};
use portfolio_admin::ordering::{MoveDirection, OrderedCollection};
use portfolio_admin::repository::document::DocumentRepository;
use portfolio_admin::repository::{
    CategoryReader, CategoryWriter, DieselRepository, MessageListQuery, MessageReader,
    MessageWriter, ProjectListQuery, ProjectReader, ProjectWriter, ReviewListQuery,
    ReviewReader, ReviewWriter,
};

mod common;

fn new_category(name: &str) -> NewCategory {
    let now = Utc::now().naive_utc();
    NewCategory {
        name: CategoryName::new(name).unwrap(),
        created_at: now,
        updated_at: now,
    }
}

fn new_project(title: &str, category_id: Option<CategoryId>) -> NewProject {
    let now = Utc::now().naive_utc();
    NewProject {
        title: ProjectTitle::new(title).unwrap(),
        description: format!("{title} description"),
        category_id,
        technologies: vec![Technology::new("Rust").unwrap()],
        media: vec![
            NewMedia {
                url: MediaUrl::new(format!("/uploads/projects/{title}-1.png")).unwrap(),
                kind: MediaKind::Image,
            },
            NewMedia {
                url: MediaUrl::new(format!("/uploads/projects/{title}-2.mp4")).unwrap(),
                kind: MediaKind::Video,
            },
        ],
        created_at: now,
        updated_at: now,
    }
}

fn category_names<R: CategoryReader>(repo: &R) -> Vec<String> {
    repo.list_categories()
        .unwrap()
        .into_iter()
        .map(|c| c.name.into_inner())
        .collect()
}

#[test]
fn categories_swap_places_when_moved() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let mut categories = OrderedCollection::<Category, _>::load(&repo).unwrap();
    for name in ["Web", "Mobile", "Design"] {
        categories.add(new_category(name)).unwrap();
    }
    let design = categories.items()[2].id.clone();

    assert_eq!(categories.move_one(&design, MoveDirection::Up), Ok(true));
    assert_eq!(category_names(&repo), vec!["Web", "Design", "Mobile"]);

    let sequences: Vec<i32> = repo
        .list_categories()
        .unwrap()
        .iter()
        .map(|c| c.sequence.get())
        .collect();
    assert_eq!(sequences, vec![1, 2, 3]);
}

#[test]
fn moving_past_the_edge_leaves_the_store_untouched() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let mut categories = OrderedCollection::<Category, _>::load(&repo).unwrap();
    let web = categories.add(new_category("Web")).unwrap();
    categories.add(new_category("Mobile")).unwrap();

    assert_eq!(categories.move_one(&web.id, MoveDirection::Up), Ok(false));
    assert_eq!(category_names(&repo), vec!["Web", "Mobile"]);
}

#[test]
fn deleting_category_keeps_its_projects() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let web = repo
        .create_category(&new_category("Web"), Sequence::new(1))
        .unwrap();
    let project = repo
        .create_project(&new_project("site", Some(web.id.clone())), Sequence::new(1))
        .unwrap();

    assert_eq!(repo.delete_category(&web.id).unwrap(), 1);

    let stored = repo.get_project_by_id(&project.id).unwrap().unwrap();
    assert_eq!(stored.category_id, Some(web.id));
    assert!(repo.list_categories().unwrap().is_empty());
}

#[test]
fn projects_are_listed_newest_sequence_first_with_media() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let web = repo
        .create_category(&new_category("Web"), Sequence::new(1))
        .unwrap();
    repo.create_project(&new_project("first", Some(web.id.clone())), Sequence::new(1))
        .unwrap();
    repo.create_project(&new_project("second", None), Sequence::new(2))
        .unwrap();

    let all = repo.list_projects(ProjectListQuery::default()).unwrap();
    let titles: Vec<&str> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["second", "first"]);
    assert_eq!(all[1].media.len(), 2);
    assert_eq!(all[1].media[0].kind, MediaKind::Image);
    assert_eq!(all[1].cover().unwrap().url.as_str(), "/uploads/projects/first-1.png");

    let filtered = repo
        .list_projects(ProjectListQuery::default().category(web.id))
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title.as_str(), "first");
}

#[test]
fn deleting_project_removes_its_media() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let project = repo
        .create_project(&new_project("site", None), Sequence::new(1))
        .unwrap();
    let extra = repo
        .add_project_media(
            &project.id,
            &[NewMedia {
                url: MediaUrl::new("/uploads/projects/site-3.png").unwrap(),
                kind: MediaKind::Image,
            }],
        )
        .unwrap();
    assert_eq!(extra[0].sequence.get(), 2);

    assert_eq!(repo.delete_project(&project.id).unwrap(), 1);
    assert!(repo.get_project_by_id(&project.id).unwrap().is_none());
    assert_eq!(repo.delete_project(&project.id).unwrap(), 0);
}

#[test]
fn messages_filter_by_read_flag() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let message = repo
        .create_message(&NewMessage {
            name: PersonName::new("Ann").unwrap(),
            email: Some(EmailAddress::new("ann@example.com").unwrap()),
            phone: None,
            body: MessageBody::new("Hello").unwrap(),
            created_at: Utc::now().naive_utc(),
        })
        .unwrap();
    assert!(!message.read);

    assert_eq!(repo.set_message_read(&message.id, true).unwrap(), 1);

    let unread = repo
        .list_messages(MessageListQuery::default().read(false))
        .unwrap();
    let read = repo
        .list_messages(MessageListQuery::default().read(true))
        .unwrap();
    assert!(unread.is_empty());
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].email.as_ref().unwrap().as_str(), "ann@example.com");
}

#[test]
fn reviews_start_pending_and_filter_by_status() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let review = repo
        .create_review(&NewReview {
            name: PersonName::new("Bob").unwrap(),
            email: EmailAddress::new("bob@example.com").unwrap(),
            company: None,
            rating: Rating::new(5).unwrap(),
            body: ReviewBody::new("Great work").unwrap(),
            created_at: Utc::now().naive_utc(),
        })
        .unwrap();
    assert_eq!(review.status, ReviewStatus::Pending);

    repo.set_review_status(&review.id, ReviewStatus::Approved)
        .unwrap();

    let approved = repo
        .list_reviews(ReviewListQuery::default().status(ReviewStatus::Approved))
        .unwrap();
    let pending = repo
        .list_reviews(ReviewListQuery::default().status(ReviewStatus::Pending))
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert!(pending.is_empty());
    assert_eq!(repo.delete_review(&review.id).unwrap(), 1);
}

#[test]
fn document_store_orders_categories_like_the_relational_one() {
    let dir = tempfile::tempdir().unwrap();
    let repo = DocumentRepository::open(dir.path()).unwrap();

    let mut categories = OrderedCollection::<Category, _>::load(&repo).unwrap();
    for name in ["Web", "Mobile", "Design"] {
        categories.add(new_category(name)).unwrap();
    }
    let web = categories.items()[0].id.clone();

    assert_eq!(categories.move_one(&web, MoveDirection::Down), Ok(true));
    assert_eq!(category_names(&repo), vec!["Mobile", "Web", "Design"]);

    let reopened = DocumentRepository::open(dir.path()).unwrap();
    assert_eq!(category_names(&reopened), vec!["Mobile", "Web", "Design"]);
}
