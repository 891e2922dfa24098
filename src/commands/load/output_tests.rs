//! Output formatting tests for load command.

#[cfg(test)]
mod tests {
    use super::super::execute::LoadResult;
    use crate::catalog::{ColumnSpec, TableSpec};
    use crate::ingest::IngestFormat;
    use rstest::{fixture, rstest};

    const TABLE_OUTPUT: &str = "\
Loaded people.csv into table 'people' (2 rows)

Columns (2):
  id BIGINT
  name VARCHAR";

    const IMAGE_OUTPUT: &str = "\
Imported backup.duckdb (12288 bytes)

Tables (2):
  orders
  people";

    #[fixture]
    fn table_result() -> LoadResult {
        LoadResult::Table {
            source: "people.csv".to_string(),
            format: IngestFormat::Csv,
            table: TableSpec {
                name: "people".to_string(),
                columns: vec![
                    ColumnSpec {
                        name: "id".to_string(),
                        data_type: "BIGINT".to_string(),
                    },
                    ColumnSpec {
                        name: "name".to_string(),
                        data_type: "VARCHAR".to_string(),
                    },
                ],
            },
            rows: 2,
        }
    }

    #[fixture]
    fn image_result() -> LoadResult {
        LoadResult::Image {
            source: "backup.duckdb".to_string(),
            bytes: 12288,
            tables: vec!["orders".to_string(), "people".to_string()],
        }
    }

    crate::output_table_test! {
        test_name: test_to_table_ingested,
        fixture: table_result,
        fixture_type: LoadResult,
        expected: TABLE_OUTPUT,
    }

    crate::output_table_test! {
        test_name: test_to_table_image,
        fixture: image_result,
        fixture_type: LoadResult,
        expected: IMAGE_OUTPUT,
    }

    crate::output_json_test! {
        test_name: test_format_json_table,
        fixture: table_result,
        fixture_type: LoadResult,
        assertions: {
            "kind": "table",
            "format": "csv",
            "rows": 2,
        },
    }

    crate::output_json_test! {
        test_name: test_format_json_image,
        fixture: image_result,
        fixture_type: LoadResult,
        assertions: {
            "kind": "image",
            "bytes": 12288,
        },
    }
}
