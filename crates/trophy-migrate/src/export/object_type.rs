//! Object type ID lookup.

use tracing::{debug, warn};

use super::context::ExportContext;
use crate::core::identifier::{Installation, LegacyTable};
use crate::core::query::SelectQuery;
use crate::error::Result;

/// Definition all category object types belong to.
pub const CATEGORY_DEFINITION: &str = "com.woltlab.wcf.category";

/// Object type of trophy categories.
pub const TROPHY_CATEGORY_OBJECT_TYPE: &str = "de.wcflabs.trophies.trophy.category";

pub fn definition_query(installation: Installation, definition: &str) -> SelectQuery {
    SelectQuery::from(installation.table(LegacyTable::ObjectTypeDefinition))
        .columns(["definitionID"])
        .filter_eq("definitionName", definition)
        .limit(1)
}

pub fn object_type_query(
    installation: Installation,
    object_type: &str,
    definition_id: i64,
) -> SelectQuery {
    SelectQuery::from(installation.table(LegacyTable::ObjectType))
        .columns(["objectTypeID"])
        .filter_eq("objectType", object_type)
        .filter_eq("definitionID", definition_id)
        .limit(1)
}

/// Look up the legacy ID of `object_type` registered under `definition`.
///
/// Returns `None` when either the definition or the object type is missing.
/// Results, including misses, are cached for the run.
pub async fn resolve_object_type_id(
    ctx: &ExportContext,
    definition: &str,
    object_type: &str,
) -> Result<Option<i64>> {
    if let Some(cached) = ctx.cache.object_type_id(definition, object_type) {
        return Ok(cached);
    }

    let id = lookup(ctx, definition, object_type).await?;
    match id {
        Some(id) => debug!("Object type {} resolved to {}", object_type, id),
        None => warn!(
            "Object type {} of {} not found in {}",
            object_type, definition, ctx.installation
        ),
    }

    ctx.cache.store_object_type_id(definition, object_type, id);
    Ok(id)
}

async fn lookup(ctx: &ExportContext, definition: &str, object_type: &str) -> Result<Option<i64>> {
    let definitions = ctx
        .db
        .select(&definition_query(ctx.installation, definition))
        .await?;
    let Some(definition_row) = definitions.first() else {
        return Ok(None);
    };
    let definition_id = definition_row.int("definitionID")?;

    let object_types = ctx
        .db
        .select(&object_type_query(ctx.installation, object_type, definition_id))
        .await?;
    object_types
        .first()
        .map(|row| row.int("objectTypeID"))
        .transpose()
}
