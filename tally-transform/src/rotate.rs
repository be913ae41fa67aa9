use log::debug;

use crate::dataset::Series;
use crate::error::DataTransformError;

/// Pivot row-major series into column-major series.
///
/// Series keys become the value keys of the output, and the value keys of the
/// first series become the output series keys. Records are matched by
/// position, not by key, so every series must list its values in the same
/// order as the first one. Records past the first series' length are ignored.
pub fn rotate(series: &[Series]) -> Result<Vec<Series>, DataTransformError> {
    let first = series.first().ok_or(DataTransformError::EmptyDataset)?;
    let expected = first.values.len();

    for s in series {
        if s.values.len() < expected {
            return Err(DataTransformError::RaggedSeries {
                series: s.key.clone(),
                len: s.values.len(),
                expected,
            });
        }
        if s.values.len() > expected {
            debug!(
                "Ignoring {} surplus values in series '{}' while rotating",
                s.values.len() - expected,
                s.key
            );
        }
    }

    let rotated = first
        .values
        .iter()
        .enumerate()
        .map(|(row_index, row_record)| {
            let values = series
                .iter()
                .map(|column| {
                    let mut record = column.values[row_index].clone();
                    record.set_key(column.key.as_str());
                    record
                })
                .collect();
            Series::new(row_record.key(), values)
        })
        .collect();

    Ok(rotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ValueRecord;

    fn fruit_by_country() -> Vec<Series> {
        vec![
            Series::new(
                "UK",
                vec![ValueRecord::new("Apples", 9), ValueRecord::new("Oranges", 3)],
            ),
            Series::new(
                "France",
                vec![ValueRecord::new("Apples", 2), ValueRecord::new("Oranges", 10)],
            ),
            Series::new(
                "Germany",
                vec![ValueRecord::new("Apples", -5), ValueRecord::new("Oranges", 3)],
            ),
        ]
    }

    #[test]
    fn test_rotate_transposes() -> Result<(), DataTransformError> {
        let rotated = rotate(&fruit_by_country())?;

        assert_eq!(rotated.len(), 2);
        assert_eq!(rotated[0].key, "Apples");
        assert_eq!(rotated[1].key, "Oranges");

        let apples = &rotated[0].values;
        let keys = apples.iter().map(|r| r.key()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["UK", "France", "Germany"]);
        let values = apples.iter().map(|r| r.value()).collect::<Vec<_>>();
        assert_eq!(values, vec![9.0, 2.0, -5.0]);
        Ok(())
    }

    #[test]
    fn test_rotate_twice_is_identity() -> Result<(), DataTransformError> {
        let data = fruit_by_country();
        assert_eq!(rotate(&rotate(&data)?)?, data);
        Ok(())
    }

    #[test]
    fn test_rotate_is_positional() -> Result<(), DataTransformError> {
        // France lists its values in a different order; they are still matched by index
        let data = vec![
            Series::new(
                "UK",
                vec![ValueRecord::new("Apples", 1), ValueRecord::new("Oranges", 2)],
            ),
            Series::new(
                "France",
                vec![ValueRecord::new("Oranges", 3), ValueRecord::new("Apples", 4)],
            ),
        ];
        let rotated = rotate(&data)?;
        assert_eq!(rotated[0].key, "Apples");
        assert_eq!(rotated[0].values[1].value(), 3.0);
        Ok(())
    }

    #[test]
    fn test_rotate_keeps_extra_fields() -> Result<(), DataTransformError> {
        let data = vec![Series::new(
            "UK",
            vec![ValueRecord::new("Apples", 1).with_field("x", 7)],
        )];
        let rotated = rotate(&data)?;
        let record = &rotated[0].values[0];
        assert_eq!(record.key(), "UK");
        assert_eq!(record.field("x"), Some(&serde_json::json!(7)));
        Ok(())
    }

    #[test]
    fn test_rotate_empty() {
        assert!(matches!(
            rotate(&[]),
            Err(DataTransformError::EmptyDataset)
        ));
    }

    #[test]
    fn test_rotate_ragged() {
        let mut data = fruit_by_country();
        data[2].values.pop();
        match rotate(&data) {
            Err(DataTransformError::RaggedSeries {
                series,
                len,
                expected,
            }) => {
                assert_eq!(series, "Germany");
                assert_eq!(len, 1);
                assert_eq!(expected, 2);
            }
            other => panic!("Expected RaggedSeries error, got {other:?}"),
        }
    }

    #[test]
    fn test_rotate_ignores_surplus_values() -> Result<(), DataTransformError> {
        let mut data = fruit_by_country();
        data[1].values.push(ValueRecord::new("Pears", 4));
        let rotated = rotate(&data)?;
        assert_eq!(rotated.len(), 2);
        Ok(())
    }
}
