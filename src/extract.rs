//! Pulling media references and board titles out of page snapshots.

use std::{collections::HashSet, sync::LazyLock};

use scraper::{Html, Selector};

use crate::{error::SessionError, media::MediaReference};

static IMG_WITH_SRCSET: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[srcset]").expect("img[srcset] selector"));

/// Returns the `srcset` value of every `<img>` in the snapshot that has a
/// non-empty one.
///
/// Values are taken verbatim. The HTML parser recovers from malformed
/// markup, so a broken snapshot yields whatever images it still contains.
pub fn extract(snapshot: &str) -> HashSet<MediaReference> {
    let document = Html::parse_document(snapshot);
    document
        .select(&IMG_WITH_SRCSET)
        .filter_map(|img| img.value().attr("srcset"))
        .filter(|srcset| !srcset.is_empty())
        .map(MediaReference::from)
        .collect()
}

/// Returns the text of every element matching `selector`, in document order.
pub fn board_titles(snapshot: &str, selector: &str) -> Result<Vec<String>, SessionError> {
    let parsed = Selector::parse(selector).map_err(|e| SessionError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;

    let document = Html::parse_document(snapshot);
    Ok(document
        .select(&parsed)
        .map(|el| el.text().collect::<String>())
        .filter(|title| !title.trim().is_empty())
        .collect())
}
