//! Sample users, posts and comment threads.

use chrono::Utc;
use configs::SeedConfig;
use domains::{CommentId, Post, PostId, User, UserId};
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use tracing::info;

use crate::app::Inkwell;

pub struct Seeded {
    pub users: Vec<UserId>,
    pub posts: Vec<PostId>,
    pub comments: Vec<CommentId>,
}

pub fn run(app: &Inkwell, config: &SeedConfig) -> anyhow::Result<Seeded> {
    let users: Vec<UserId> = (0..config.users)
        .map(|i| {
            let username: String = Username().fake();
            let user = User::new(UserId::new(), format!("{username}_{i}"), Name().fake::<String>());
            let id = user.id;
            app.users.insert(user);
            id
        })
        .collect();

    let posts: Vec<PostId> = (0..config.posts)
        .map(|i| {
            let title: String = Sentence(3..7).fake();
            let post = Post::new(PostId::new(), title, users[i % users.len()], Utc::now());
            let id = post.id;
            app.posts.insert(post);
            id
        })
        .collect();

    let mut comments = Vec::new();
    for (p, &post_id) in posts.iter().enumerate() {
        for c in 0..config.comments_per_post {
            let author = users[(p + c) % users.len()];
            let text: String = Sentence(4..12).fake();
            let root = app.comments.create_comment(&text, author, post_id)?;
            comments.push(root.id());

            for r in 0..config.replies_per_comment {
                let replier = users[(p + c + r + 1) % users.len()];
                let text: String = Sentence(2..8).fake();
                let reply = app.comments.create_reply(&text, replier, post_id, root.id())?;
                comments.push(reply.id());
            }
        }
    }

    info!(users = users.len(), posts = posts.len(), comments = comments.len(), "sample data seeded");
    Ok(Seeded { users, posts, comments })
}
