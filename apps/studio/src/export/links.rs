//! Link normalisation on the detached export clone.

use tracing::warn;
use url::Url;

use crate::errors::LinkNormalizationError;
use crate::preview::tree::{Element, Tag};

/// Rewrites every `a[href]` under `root` to an absolute URL resolved against
/// `base` and marks it to open in a new tab. An href that cannot be resolved
/// is removed (the anchor text stays) and reported; other links are
/// unaffected.
pub fn normalize_links(root: &mut Element, base: &Url) -> Vec<LinkNormalizationError> {
    let mut failures = Vec::new();
    root.walk_mut(&mut |el| {
        if el.tag != Tag::A {
            return;
        }
        let Some(raw) = el.get_attr("href").map(str::to_string) else {
            return;
        };
        match base.join(&raw) {
            Ok(absolute) => el.set_attr("href", absolute.as_str()),
            Err(e) => {
                el.remove_attr("href");
                let failure = LinkNormalizationError {
                    href: raw,
                    text: el.text_content(),
                    reason: e.to_string(),
                };
                warn!(href = %failure.href, reason = %failure.reason, "Dropping unresolvable link");
                failures.push(failure);
            }
        }
        el.set_attr("target", "_blank");
        el.set_attr("rel", "noopener");
    });
    failures
}
