#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use quire::application::comments::{CommentThread, SubmitOutcome};
use quire::domain::error::DomainError;
use quire::domain::types::CommentStatus;
use serde_json::json;

use crate::args::{CommentSortArg, CommentsCmd};
use crate::client::{CliError, Ctx, OpContext};
use crate::io::read_value;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: CommentsCmd) -> Result<(), CliError> {
    match cmd {
        CommentsCmd::List {
            article,
            page,
            sort,
            show_all,
            reply_pages,
        } => list(ctx, article, page, sort, show_all, reply_pages).await,
        CommentsCmd::Submit {
            article,
            parent,
            content,
            content_file,
        } => submit(ctx, article, parent, content, content_file).await,
        CommentsCmd::Delete {
            article,
            id,
            parent,
        } => delete(ctx, article, id, parent).await,
        CommentsCmd::Review {
            article,
            id,
            status,
        } => review(ctx, article, id, status.into()).await,
        CommentsCmd::User {
            user,
            page,
            page_size,
        } => {
            let listed = ctx
                .comments
                .user_comments(user, page, page_size)
                .await
                .op("comments.user")?;
            print_json(&listed)
        }
    }
}

async fn list(
    ctx: &Ctx,
    article: i64,
    page: u32,
    sort: Option<CommentSortArg>,
    show_all: bool,
    reply_pages: u32,
) -> Result<(), CliError> {
    let svc = &ctx.comments;
    let mut thread = svc.open(article, ctx.viewer().await?, show_all);
    if let Some(sort) = sort {
        thread.set_sort(sort.into());
    }
    svc.load_page(&mut thread, page).await.op("comments.list")?;

    let parents: Vec<i64> = thread.nodes().iter().map(|node| node.comment.id).collect();
    for parent in parents {
        for _ in 0..reply_pages {
            if !svc
                .load_more_replies(&mut thread, parent)
                .await
                .op("comments.replies")?
            {
                break;
            }
        }
    }

    print_json(&json!({
        "article_id": thread.article_id(),
        "sort": thread.sort().as_str(),
        "cursor": thread.cursor(),
        "comments": thread.nodes(),
    }))
}

async fn submit(
    ctx: &Ctx,
    article: i64,
    parent: Option<i64>,
    content: Option<String>,
    content_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let content = read_value(content, content_file)?;
    let svc = &ctx.comments;
    let mut thread = svc.open(article, ctx.viewer().await?, false);
    let parent_loaded = match parent {
        Some(parent) => locate(ctx, &mut thread, parent, None).await?,
        None => true,
    };
    if !parent_loaded {
        return Err(DomainError::not_found("comment")).op("comments.submit");
    }
    let outcome = svc
        .submit(&mut thread, &content, parent)
        .await
        .op("comments.submit")?;
    if let SubmitOutcome::AwaitingReview(_) = outcome {
        eprintln!("Your comment is awaiting review.");
    }
    print_json(&outcome)
}

async fn delete(ctx: &Ctx, article: i64, id: i64, parent: Option<i64>) -> Result<(), CliError> {
    let viewer = ctx.viewer().await?;
    let mut thread = ctx.comments.open(article, viewer, viewer.is_privileged());
    if !locate(ctx, &mut thread, id, parent).await? {
        return Err(DomainError::not_found("comment")).op("comments.delete");
    }
    ctx.comments
        .delete(&mut thread, id)
        .await
        .op("comments.delete")?;
    println!("deleted");
    Ok(())
}

async fn review(
    ctx: &Ctx,
    article: i64,
    id: i64,
    status: CommentStatus,
) -> Result<(), CliError> {
    let mut thread = ctx.comments.open(article, ctx.viewer().await?, true);
    let reviewed = ctx
        .comments
        .review(&mut thread, id, status)
        .await
        .op("comments.review")?;
    print_json(&reviewed)
}

/// Page through the thread until `id` is loaded, descending into the
/// replies of `parent` when given.
async fn locate(
    ctx: &Ctx,
    thread: &mut CommentThread,
    id: i64,
    parent: Option<i64>,
) -> Result<bool, CliError> {
    let svc = &ctx.comments;
    let top = parent.unwrap_or(id);
    let mut page = 1;
    loop {
        svc.load_page(thread, page).await.op("comments.locate")?;
        if thread.node(top).is_some() {
            break;
        }
        match thread.cursor().and_then(|cursor| cursor.next_page()) {
            Some(next) if next != page => page = next,
            _ => return Ok(false),
        }
    }
    while thread.find(id).is_none() {
        if !svc
            .load_more_replies(thread, top)
            .await
            .op("comments.locate")?
        {
            return Ok(false);
        }
    }
    Ok(true)
}
