//! Page-order-preserving document concatenation.
//!
//! Merging is pure concatenation: old pages first, then new pages, with
//! no deduplication, reordering, or transformation. The mechanics follow
//! the usual `lopdf` recipe — renumber the incoming document past the
//! base's `max_id`, pull its object table across, then splice its page
//! references onto the base page tree's `Kids` array.

use lopdf::{Document, Object, ObjectId};

use crate::error::{Error, Result};

/// Number of pages reachable from a document's page tree.
pub fn page_count(document: &Document) -> usize {
    document.get_pages().len()
}

/// Combine up to two documents into one, old pages first.
///
/// Returns `None` when both inputs are absent — there is nothing to
/// publish and the caller should leave the destination alone. A single
/// present input passes through untouched. The output page count is
/// always `count(old) + count(new)`.
pub fn merge_documents(old: Option<Document>, new: Option<Document>) -> Result<Option<Document>> {
    match (old, new) {
        (None, None) => Ok(None),
        (Some(single), None) | (None, Some(single)) => Ok(Some(single)),
        (Some(mut base), Some(incoming)) => {
            append_pages(&mut base, incoming)?;
            Ok(Some(base))
        }
    }
}

/// Append every page of `incoming` after the last page of `base`,
/// preserving `incoming`'s internal page order. Returns the number of
/// pages appended.
pub fn append_pages(base: &mut Document, mut incoming: Document) -> Result<usize> {
    let appended = incoming.get_pages().len();
    if appended == 0 {
        return Ok(0);
    }

    // Shift incoming object ids past the base's to avoid collisions.
    incoming.renumber_objects_with(base.max_id + 1);
    base.max_id = incoming.max_id;

    let page_ids: Vec<ObjectId> = incoming.get_pages().into_values().collect();
    base.objects.extend(incoming.objects);
    graft_pages(base, &page_ids)?;

    Ok(appended)
}

/// Splice page references onto the base document's page tree.
fn graft_pages(base: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let catalog = base
        .catalog_mut()
        .map_err(|err| Error::page_tree(format!("no document catalog: {err}")))?;

    let pages_id = catalog
        .get(b"Pages")
        .and_then(|pages| pages.as_reference())
        .map_err(|err| Error::page_tree(format!("no pages reference in catalog: {err}")))?;

    let pages = base
        .get_object_mut(pages_id)
        .map_err(|err| Error::page_tree(format!("unresolvable pages object: {err}")))?;

    let Object::Dictionary(dict) = pages else {
        return Err(Error::page_tree("pages object is not a dictionary"));
    };

    {
        let kids = dict
            .get_mut(b"Kids")
            .map_err(|_| Error::page_tree("pages dictionary has no kids array"))?;
        let Object::Array(kids) = kids else {
            return Err(Error::page_tree("kids is not an array"));
        };
        kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));
    }

    let count = dict.get(b"Count").and_then(|count| count.as_i64()).unwrap_or(0);
    dict.set("Count", Object::Integer(count + page_ids.len() as i64));

    Ok(())
}
