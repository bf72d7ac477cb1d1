//! Handler for `jive_search_content`.

use jive_application::use_cases::SearchService;
use jive_domain::error::Result;
use jive_infrastructure::ServiceContext;
use serde_json::{Value, json};

use super::helpers;
use crate::args::SearchContentArgs;

/// `jive_search_content`: semantic, keyword, or hybrid search across the
/// selected corpora.
pub async fn search(ctx: &ServiceContext, args: SearchContentArgs) -> Result<Value> {
    let (_, store) = ctx.store(args.namespace.as_deref()).await?;
    let service = SearchService::new(store, ctx.embedding());

    let search_type = helpers::parse_search_type(args.search_type.as_deref())?;
    let content_types = helpers::parse_content_types(&args.content_types)?;
    let filter = helpers::build_filter(args.filters.as_ref())?;

    let hits = service
        .search(
            &args.query,
            search_type,
            &content_types,
            &filter,
            args.limit.unwrap_or(10),
            args.include_scores,
        )
        .await?;
    Ok(json!({
        "query": args.query,
        "search_type": search_type.as_str(),
        "total": hits.len(),
        "results": hits,
    }))
}
