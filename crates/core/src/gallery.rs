//! The user's image collection with optimistic reordering
//!
//! Reordering is applied locally first. The new order is persisted later
//! through `/change-order`; if that fails the caller rolls back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Image as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Public URL of the stored image
    #[serde(alias = "imageUrl", alias = "url")]
    pub image: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Position of one image, as sent to `/change-order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOrder {
    #[serde(rename = "_id")]
    pub id: String,
    pub order: u32,
}

/// Images sorted by `order`
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    images: Vec<Image>,
    saved: Vec<Image>,
}

impl Gallery {
    pub fn new(mut images: Vec<Image>) -> Self {
        images.sort_by_key(|image| image.order);
        Self {
            saved: images.clone(),
            images,
        }
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.images.iter().position(|image| image.id == id)
    }

    /// Whether local order differs from the last saved order
    pub fn is_dirty(&self) -> bool {
        self.images != self.saved
    }

    /// Move the image at `from` to `to`, renumbering every image
    pub fn move_image(&mut self, from: usize, to: usize) -> CoreResult<()> {
        let len = self.images.len();
        if from >= len || to >= len {
            return Err(CoreError::invalid_order(format!(
                "cannot move {from} to {to} in a gallery of {len}"
            )));
        }
        if from == to {
            return Ok(());
        }

        let image = self.images.remove(from);
        self.images.insert(to, image);
        self.renumber();
        tracing::debug!(from, to, "Reordered gallery locally");
        Ok(())
    }

    /// Order to persist for the current local arrangement
    pub fn pending_order(&self) -> Vec<ImageOrder> {
        self.images
            .iter()
            .map(|image| ImageOrder {
                id: image.id.clone(),
                order: image.order,
            })
            .collect()
    }

    /// Accept the local arrangement as persisted
    pub fn mark_saved(&mut self) {
        self.saved = self.images.clone();
    }

    /// Restore the last persisted arrangement
    pub fn rollback(&mut self) {
        self.images = self.saved.clone();
    }

    /// Append freshly uploaded images
    pub fn extend(&mut self, uploaded: impl IntoIterator<Item = Image>) {
        self.images.extend(uploaded);
        self.images.sort_by_key(|image| image.order);
        self.mark_saved();
    }

    /// Swap in an updated image, keeping its position
    pub fn replace(&mut self, updated: Image) -> bool {
        let Some(index) = self.position(&updated.id) else {
            return false;
        };
        self.images[index] = updated.clone();
        if let Some(saved) = self.saved.iter_mut().find(|image| image.id == updated.id) {
            *saved = updated;
        }
        true
    }

    /// Drop a deleted image
    pub fn remove(&mut self, id: &str) -> Option<Image> {
        let index = self.position(id)?;
        self.saved.retain(|image| image.id != id);
        Some(self.images.remove(index))
    }

    fn renumber(&mut self) {
        for (index, image) in self.images.iter_mut().enumerate() {
            image.order = u32::try_from(index).unwrap_or(u32::MAX);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str, order: u32) -> Image {
        Image {
            id: id.to_string(),
            title: format!("title {id}"),
            image: format!("https://cdn.example.com/{id}.png"),
            order,
            created_at: None,
        }
    }

    fn ids(gallery: &Gallery) -> Vec<&str> {
        gallery.images().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_new_sorts_by_order() {
        let gallery = Gallery::new(vec![image("b", 2), image("a", 0), image("c", 5)]);
        assert_eq!(ids(&gallery), ["a", "b", "c"]);
        assert!(!gallery.is_dirty());
    }

    #[test]
    fn test_move_renumbers_and_marks_dirty() {
        let mut gallery = Gallery::new(vec![image("a", 0), image("b", 1), image("c", 2)]);
        gallery.move_image(2, 0).unwrap();

        assert_eq!(ids(&gallery), ["c", "a", "b"]);
        assert!(gallery.is_dirty());
        assert_eq!(
            gallery.pending_order(),
            vec![
                ImageOrder { id: "c".into(), order: 0 },
                ImageOrder { id: "a".into(), order: 1 },
                ImageOrder { id: "b".into(), order: 2 },
            ]
        );
    }

    #[test]
    fn test_rollback_restores_saved_order() {
        let mut gallery = Gallery::new(vec![image("a", 0), image("b", 1)]);
        gallery.move_image(0, 1).unwrap();
        gallery.rollback();
        assert_eq!(ids(&gallery), ["a", "b"]);
        assert!(!gallery.is_dirty());

        gallery.move_image(0, 1).unwrap();
        gallery.mark_saved();
        gallery.rollback();
        assert_eq!(ids(&gallery), ["b", "a"]);
    }

    #[test]
    fn test_out_of_range_move_is_rejected() {
        let mut gallery = Gallery::new(vec![image("a", 0)]);
        assert!(matches!(
            gallery.move_image(0, 1),
            Err(CoreError::InvalidOrder { .. })
        ));
        assert!(!gallery.is_dirty());
    }

    #[test]
    fn test_replace_and_remove() {
        let mut gallery = Gallery::new(vec![image("a", 0), image("b", 1)]);
        let mut renamed = image("b", 1);
        renamed.title = "renamed".into();
        assert!(gallery.replace(renamed));
        assert_eq!(gallery.images()[1].title, "renamed");
        assert!(!gallery.is_dirty());

        assert_eq!(gallery.remove("a").map(|i| i.id), Some("a".to_string()));
        assert_eq!(ids(&gallery), ["b"]);
        assert!(gallery.remove("zzz").is_none());
    }

    #[test]
    fn test_wire_format() {
        let image: Image = serde_json::from_value(serde_json::json!({
            "_id": "66a1",
            "title": "Sunset",
            "image": "https://cdn.example.com/sunset.jpg",
            "order": 3,
            "userId": "u1",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(image.id, "66a1");
        assert_eq!(image.order, 3);
        assert!(image.created_at.is_some());

        let order = serde_json::to_value(ImageOrder { id: "66a1".into(), order: 0 }).unwrap();
        assert_eq!(order, serde_json::json!({"_id": "66a1", "order": 0}));
    }
}
