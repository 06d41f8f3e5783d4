//! Recipient resolution against the tabular source.

use crate::sheets::Spreadsheet;
use fotodrop_core::{DeliveryError, DeliveryResult, RecipientRecord};
use std::sync::Arc;

/// Looks a model's contact row up in the spreadsheet. Every call re-reads
/// the source; records are never cached, so the row index matches the sheet
/// as it was at resolution time (single-writer assumption).
pub struct RecipientResolver {
    sheet: Arc<dyn Spreadsheet>,
}

impl RecipientResolver {
    pub fn new(sheet: Arc<dyn Spreadsheet>) -> Self {
        RecipientResolver { sheet }
    }

    /// Scan body rows in order; the first row whose model column equals
    /// `model_id` wins. Columns are `[unused, email, name, modelId]`.
    pub async fn resolve(&self, model_id: &str) -> DeliveryResult<RecipientRecord> {
        let rows = self.sheet.fetch_rows().await?;
        if rows.is_empty() {
            return Err(DeliveryError::EmptySource);
        }

        for (index, row) in rows.iter().enumerate() {
            if row.get(3).map(String::as_str) == Some(model_id) {
                return Ok(RecipientRecord {
                    email: row.get(1).cloned().unwrap_or_default(),
                    name: row.get(2).cloned().unwrap_or_default(),
                    row_index: index,
                });
            }
        }

        Err(DeliveryError::RecipientNotFound(model_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::RowColor;
    use async_trait::async_trait;

    struct StaticSheet {
        rows: Vec<Vec<String>>,
    }

    #[async_trait]
    impl Spreadsheet for StaticSheet {
        async fn fetch_rows(&self) -> DeliveryResult<Vec<Vec<String>>> {
            Ok(self.rows.clone())
        }

        async fn color_row(&self, _sheet_row_index: usize, _color: RowColor) -> DeliveryResult<()> {
            Ok(())
        }
    }

    fn row(email: &str, name: &str, model: &str) -> Vec<String> {
        vec!["".into(), email.into(), name.into(), model.into()]
    }

    fn resolver(rows: Vec<Vec<String>>) -> RecipientResolver {
        RecipientResolver::new(Arc::new(StaticSheet { rows }))
    }

    #[tokio::test]
    async fn resolves_matching_row_with_index() {
        let resolver = resolver(vec![
            row("x@x.com", "Xi", "001"),
            row("y@y.com", "Yan", "002"),
            row("z@z.com", "Zoe", "003"),
            row("a@x.com", "Ana", "042"),
        ]);

        let record = resolver.resolve("042").await.unwrap();
        assert_eq!(record.email, "a@x.com");
        assert_eq!(record.name, "Ana");
        assert_eq!(record.row_index, 3);
    }

    #[tokio::test]
    async fn first_matching_row_wins() {
        let resolver = resolver(vec![
            row("first@x.com", "First", "042"),
            row("second@x.com", "Second", "042"),
        ]);

        let record = resolver.resolve("042").await.unwrap();
        assert_eq!(record.email, "first@x.com");
        assert_eq!(record.row_index, 0);
    }

    #[tokio::test]
    async fn missing_model_is_not_found() {
        let resolver = resolver(vec![row("a@x.com", "Ana", "042")]);
        assert!(matches!(
            resolver.resolve("999").await,
            Err(DeliveryError::RecipientNotFound(id)) if id == "999"
        ));
    }

    #[tokio::test]
    async fn empty_source_is_its_own_error() {
        let resolver = resolver(vec![]);
        assert!(matches!(
            resolver.resolve("042").await,
            Err(DeliveryError::EmptySource)
        ));
    }

    #[tokio::test]
    async fn short_rows_resolve_with_empty_fields() {
        // A row missing the model column can never match; a matching row
        // missing name/email resolves with empty strings.
        let resolver = resolver(vec![
            vec!["".into(), "a@x.com".into()],
            vec!["".into(), "".into(), "".into(), "042".into()],
        ]);

        let record = resolver.resolve("042").await.unwrap();
        assert_eq!(record.email, "");
        assert_eq!(record.name, "");
        assert_eq!(record.row_index, 1);
    }
}
