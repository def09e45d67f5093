#![deny(clippy::all, clippy::pedantic)]

use quire::application::ports::ListQuery;
use quire::domain::error::DomainError;
use quire_api_types::CategoryWriteRequest;
use serde_json::json;

use crate::args::CategoriesCmd;
use crate::client::{CliError, Ctx, OpContext};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: CategoriesCmd) -> Result<(), CliError> {
    let catalog = &ctx.catalog;
    match cmd {
        CategoriesCmd::List {
            page,
            page_size,
            keyword,
        } => {
            let mut query = ListQuery::new(page, page_size);
            query.keyword = keyword;
            let listed = catalog.list_categories(&query).await.op("categories.list")?;
            print_json(&listed)
        }
        CategoriesCmd::Get { id } => {
            let category = catalog
                .category(id)
                .await
                .ok_or(DomainError::not_found("category"))
                .op("categories.get")?;
            print_json(category.as_ref())
        }
        CategoriesCmd::Resolve { name } => {
            let id = catalog
                .resolve_category_name(&name)
                .await
                .op("categories.resolve")?;
            print_json(&json!({ "name": name, "id": id }))
        }
        CategoriesCmd::Create { name, description } => {
            let request = CategoryWriteRequest { name, description };
            let created = catalog
                .create_category(&request)
                .await
                .op("categories.create")?;
            print_json(created.as_ref())
        }
        CategoriesCmd::Update {
            id,
            name,
            description,
        } => {
            let request = CategoryWriteRequest { name, description };
            let updated = catalog
                .update_category(id, &request)
                .await
                .op("categories.update")?;
            print_json(updated.as_ref())
        }
        CategoriesCmd::Delete { id } => {
            catalog.delete_category(id).await.op("categories.delete")?;
            println!("deleted");
            Ok(())
        }
    }
}
