//! Concurrent like traffic against the seeded data.

use std::sync::Barrier;
use std::thread;

use anyhow::anyhow;
use configs::BurstConfig;
use domains::{DomainError, ErrorKind};
use fake::Fake;

use crate::app::Inkwell;
use crate::seed::Seeded;

#[derive(Debug, Default)]
pub struct Tally {
    pub likes: usize,
    pub unlikes: usize,
    pub toggles: usize,
    /// Expected refusals: duplicate likes, unlikes of nothing
    pub rejected: usize,
}

impl Tally {
    fn merge(&mut self, other: Tally) {
        self.likes += other.likes;
        self.unlikes += other.unlikes;
        self.toggles += other.toggles;
        self.rejected += other.rejected;
    }
}

enum Op {
    Like,
    Unlike,
    Toggle,
}

/// Runs `config.workers` threads, released together, each issuing
/// `config.rounds` random operations.
pub fn run(app: &Inkwell, seeded: &Seeded, config: &BurstConfig) -> anyhow::Result<Tally> {
    if seeded.posts.is_empty() {
        return Ok(Tally::default());
    }
    let barrier = Barrier::new(config.workers);

    thread::scope(|s| {
        let handles: Vec<_> = (0..config.workers)
            .map(|_| s.spawn(|| worker(app, seeded, config.rounds, &barrier)))
            .collect();

        let mut total = Tally::default();
        for handle in handles {
            let tally = handle.join().map_err(|_| anyhow!("burst worker panicked"))??;
            total.merge(tally);
        }
        Ok(total)
    })
}

fn worker(app: &Inkwell, seeded: &Seeded, rounds: usize, barrier: &Barrier) -> anyhow::Result<Tally> {
    barrier.wait();

    let mut tally = Tally::default();
    for _ in 0..rounds {
        let user_id = seeded.users[(0..seeded.users.len()).fake::<usize>()];
        let post_id = seeded.posts[(0..seeded.posts.len()).fake::<usize>()];

        let outcome = match (0..4).fake::<u8>() {
            0 => app.post_likes.like(post_id, user_id).map(|_| Op::Like),
            1 => app.post_likes.unlike(post_id, user_id).map(|_| Op::Unlike),
            2 => app.post_likes.toggle(post_id, user_id).map(|_| Op::Toggle),
            _ if seeded.comments.is_empty() => continue,
            _ => {
                let comment_id = seeded.comments[(0..seeded.comments.len()).fake::<usize>()];
                app.comment_likes.toggle(comment_id, user_id).map(|_| Op::Toggle)
            }
        };

        match outcome {
            Ok(Op::Like) => tally.likes += 1,
            Ok(Op::Unlike) => tally.unlikes += 1,
            Ok(Op::Toggle) => tally.toggles += 1,
            Err(err) if is_expected(&err) => tally.rejected += 1,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(tally)
}

fn is_expected(err: &DomainError) -> bool {
    matches!(err.kind(), ErrorKind::Conflict | ErrorKind::NotFound)
}
