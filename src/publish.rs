//! Batch publishing: read each post file, convert it, send it.
//!
//! Posts are handled one at a time. A failure is logged and recorded against
//! that post only; the rest of the batch still runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::PostEntry;
use crate::error::{Error, Result};
use crate::front_matter::{self, FrontMatter};
use crate::markdown_to_gutenberg;
use crate::wordpress::PostSink;

#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Sleep between successive posts. Not applied after the last one.
    pub delay: Duration,
    /// Convert and resolve ids without sending anything.
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum PostStatus {
    Published { id: u64 },
    DryRun { id: u64, bytes: usize },
    Failed(Error),
}

#[derive(Debug)]
pub struct PostOutcome {
    pub file: PathBuf,
    pub status: PostStatus,
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub outcomes: Vec<PostOutcome>,
}

impl PublishReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, PostStatus::Failed(_)))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Publish every post in order, isolating failures per post.
pub fn publish_posts(
    posts: &[PostEntry],
    sink: &dyn PostSink,
    options: &PublishOptions,
) -> PublishReport {
    let mut report = PublishReport::default();

    for (index, post) in posts.iter().enumerate() {
        if index > 0 && !options.delay.is_zero() {
            thread::sleep(options.delay);
        }

        let status = match publish_one(post, sink, options.dry_run) {
            Ok(status) => status,
            Err(e) => {
                error!(file = %post.file.display(), error = %e, "failed to publish post");
                PostStatus::Failed(e)
            }
        };
        report.outcomes.push(PostOutcome {
            file: post.file.clone(),
            status,
        });
    }

    if report.is_success() {
        info!(posts = report.outcomes.len(), "all posts processed");
    } else {
        warn!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "some posts failed"
        );
    }

    report
}

fn publish_one(post: &PostEntry, sink: &dyn PostSink, dry_run: bool) -> Result<PostStatus> {
    let raw = fs::read_to_string(&post.file).map_err(|e| Error::io(&post.file, e))?;
    let (front, body) = front_matter::split(&raw);
    let content = markdown_to_gutenberg(body);
    let id = resolve_id(post, &front, sink)?;

    if dry_run {
        info!(file = %post.file.display(), id, bytes = content.len(), "dry run, not sending");
        return Ok(PostStatus::DryRun {
            id,
            bytes: content.len(),
        });
    }

    sink.update_content(id, &content)?;
    info!(file = %post.file.display(), id, title = front.title().unwrap_or(""), "published");

    Ok(PostStatus::Published { id })
}

fn resolve_id(post: &PostEntry, front: &FrontMatter, sink: &dyn PostSink) -> Result<u64> {
    if let Some(id) = post.id {
        return Ok(id);
    }

    let slug = post
        .slug
        .as_deref()
        .or(front.slug())
        .ok_or_else(|| Error::UnresolvedPost {
            file: post.file.clone(),
        })?;

    sink.find_post_id(slug)?
        .ok_or_else(|| Error::SlugNotFound {
            slug: slug.to_string(),
        })
}

/// Keep the posts whose file matches one of `files`. An empty filter keeps all.
pub fn select_posts(posts: &[PostEntry], files: &[PathBuf]) -> Vec<PostEntry> {
    posts
        .iter()
        .filter(|post| files.is_empty() || files.iter().any(|file| same_file(&post.file, file)))
        .cloned()
        .collect()
}

fn same_file(configured: &Path, requested: &Path) -> bool {
    if configured == requested || configured.ends_with(requested) {
        return true;
    }
    match (configured.canonicalize(), requested.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
