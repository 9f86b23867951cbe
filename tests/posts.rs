//! Post creation and profile-timeline tests.

mod common;

use common::{app, base_plus, create_user, insert_post_at};
use tern::Error;
use uuid::Uuid;

#[tokio::test]
async fn create_post_round_trips_through_timeline() {
    let app = app().await;
    let author = create_user(&app, "writer").await;

    let post = app
        .posts
        .create_post(author.id, "first post")
        .await
        .unwrap();
    assert_eq!(post.author_id, author.id);
    assert_eq!(post.body, "first post");

    let timeline = app.posts.posts_by_author(author.id, 25).await.unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].id, post.id);
}

#[tokio::test]
async fn empty_body_rejected() {
    let app = app().await;
    let author = create_user(&app, "silent").await;

    let err = app.posts.create_post(author.id, "").await.unwrap_err();
    assert!(matches!(err, Error::ValidationRejected(_)), "{err:?}");
}

#[tokio::test]
async fn body_length_is_bounded_at_140_chars() {
    let app = app().await;
    let author = create_user(&app, "verbose").await;

    let at_limit = "x".repeat(140);
    assert!(app.posts.create_post(author.id, &at_limit).await.is_ok());

    let over_limit = "x".repeat(141);
    let err = app
        .posts
        .create_post(author.id, &over_limit)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ValidationRejected(_)), "{err:?}");
}

#[tokio::test]
async fn create_post_unknown_author() {
    let app = app().await;

    let err = app
        .posts
        .create_post(Uuid::new_v4(), "orphan")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UserNotFound(_)), "{err:?}");
}

#[tokio::test]
async fn timeline_is_newest_first_and_limited() {
    let app = app().await;
    let author = create_user(&app, "prolific").await;
    let other = create_user(&app, "bystander").await;

    let oldest = insert_post_at(&app, author.id, "oldest", base_plus(1)).await;
    let middle = insert_post_at(&app, author.id, "middle", base_plus(2)).await;
    let newest = insert_post_at(&app, author.id, "newest", base_plus(3)).await;
    insert_post_at(&app, other.id, "someone else", base_plus(4)).await;

    let timeline = app.posts.posts_by_author(author.id, 25).await.unwrap();
    let ids: Vec<_> = timeline.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);

    let limited = app.posts.posts_by_author(author.id, 2).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, newest.id);
}

#[tokio::test]
async fn timeline_unknown_author() {
    let app = app().await;

    let err = app
        .posts
        .posts_by_author(Uuid::new_v4(), 25)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UserNotFound(_)), "{err:?}");
}
