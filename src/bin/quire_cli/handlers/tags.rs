#![deny(clippy::all, clippy::pedantic)]

use quire::application::ports::ListQuery;
use quire::domain::error::DomainError;
use quire_api_types::TagWriteRequest;

use crate::args::TagsCmd;
use crate::client::{CliError, Ctx, OpContext};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: TagsCmd) -> Result<(), CliError> {
    let catalog = &ctx.catalog;
    match cmd {
        TagsCmd::List {
            page,
            page_size,
            keyword,
        } => {
            let mut query = ListQuery::new(page, page_size);
            query.keyword = keyword;
            let listed = catalog.list_tags(&query).await.op("tags.list")?;
            print_json(&listed)
        }
        TagsCmd::Hot { limit } => print_json(&catalog.hot_tags(limit).await.op("tags.hot")?),
        TagsCmd::Get { id } => {
            let tag = catalog
                .tag(id)
                .await
                .ok_or(DomainError::not_found("tag"))
                .op("tags.get")?;
            print_json(tag.as_ref())
        }
        TagsCmd::Create { name } => {
            let created = catalog
                .create_tag(&TagWriteRequest { name })
                .await
                .op("tags.create")?;
            print_json(created.as_ref())
        }
        TagsCmd::Update { id, name } => {
            let updated = catalog
                .update_tag(id, &TagWriteRequest { name })
                .await
                .op("tags.update")?;
            print_json(updated.as_ref())
        }
        TagsCmd::Delete { id } => {
            catalog.delete_tag(id).await.op("tags.delete")?;
            println!("deleted");
            Ok(())
        }
    }
}
