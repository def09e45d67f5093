#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use quire::application::pagination::Paged;
use quire::application::search::SearchController;
use quire::domain::entities::ArticleSummary;
use serde_json::{Value, json};

use crate::args::{ArticlesCmd, SearchArgs};
use crate::client::{CliError, Ctx, OpContext};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: ArticlesCmd) -> Result<(), CliError> {
    match cmd {
        ArticlesCmd::Search(args) => search(ctx, args).await,
        ArticlesCmd::Get { id } => {
            let article = ctx.client.get_article(id).await.op("articles.get")?;
            let mut out = serde_json::to_value(&article)?;
            label(ctx, &article.summary, &mut out).await;
            print_json(&out)
        }
        ArticlesCmd::Like { id } => {
            print_json(&ctx.client.toggle_like(id).await.op("articles.like")?)
        }
        ArticlesCmd::Favorite { id } => {
            print_json(&ctx.client.toggle_favorite(id).await.op("articles.favorite")?)
        }
        ArticlesCmd::History { page, page_size } => {
            let history: Paged<_> = ctx
                .client
                .reading_history(page, page_size)
                .await
                .op("articles.history")?
                .into();
            print_json(&history)
        }
    }
}

async fn search(ctx: &Ctx, args: SearchArgs) -> Result<(), CliError> {
    let mut url = ctx
        .client
        .base()
        .join("search")
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    url.set_query(args.query.as_deref().filter(|q| !q.is_empty()));

    let mut ctl = SearchController::new(
        Arc::new(ctx.client.clone()),
        Arc::clone(&ctx.catalog),
        ctx.settings.search.page_size.get(),
        url.clone(),
    );
    let mut fetched = ctl
        .navigate(url)
        .await
        .op("articles.search")?
        .is_some();

    if args.has_filter_flags() {
        let mut state = ctl.filters().clone();
        if let Some(keyword) = args.keyword {
            state.keyword = Some(keyword);
        }
        if let Some(author) = args.author {
            state.author = Some(author);
        }
        if let Some(sort_by) = args.sort_by {
            state.sort_by = sort_by.into();
        }
        if let Some(range) = args.time_range {
            state.time_range = range.into();
        }
        state.category_ids.extend(args.category_ids);
        state.tag_ids.extend(args.tag_ids);
        ctl.change(state).await.op("articles.search")?;
        fetched = true;
    }
    if let Some(page) = args.page {
        ctl.go_to_page(page).await.op("articles.search")?;
    } else if !fetched {
        ctl.search().await.op("articles.search")?;
    }

    let Some(results) = ctl.results() else {
        return Err(CliError::InvalidInput("search produced no results".into()));
    };
    let mut items = Vec::with_capacity(results.items.len());
    for article in &results.items {
        let mut out = serde_json::to_value(article)?;
        label(ctx, article, &mut out).await;
        items.push(out);
    }
    print_json(&json!({
        "url": ctl.url().as_str(),
        "cursor": results.cursor,
        "items": items,
    }))
}

/// Attach display names for the article's category and tags.
async fn label(ctx: &Ctx, article: &ArticleSummary, out: &mut Value) {
    let category = match article.category_id {
        Some(id) => Value::String(ctx.catalog.category_label(id).await),
        None => Value::Null,
    };
    let tags = ctx.catalog.tag_labels(&article.tag_ids).await;
    if let Value::Object(map) = out {
        map.insert("category".into(), category);
        map.insert("tags".into(), json!(tags));
    }
}
