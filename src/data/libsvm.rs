//! LibSVM format dataset implementation
//!
//! Supports loading datasets in the libsvm format:
//! label index:value index:value ...
//!
//! Example:
//! 3 1:0.5 3:1.2 7:0.8
//! 1 2:0.3 5:2.1
//!
//! Labels are kept as written, so a file may hold any number of classes.

use crate::core::{Dataset, Result, SVMError, Sample, SparseVector};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dataset implementation for LibSVM format files
#[derive(Debug, Clone)]
pub struct LibSVMDataset {
    samples: Vec<Sample>,
    dimensions: usize,
}

impl LibSVMDataset {
    /// Load a dataset from a LibSVM format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a dataset from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut samples = Vec::new();
        let mut dimensions = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(SVMError::IoError)?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let sample = Self::parse_line(line).map_err(|e| {
                SVMError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
            })?;
            dimensions = dimensions.max(sample.features.dim());
            samples.push(sample);
        }

        if samples.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        Ok(LibSVMDataset {
            samples,
            dimensions,
        })
    }

    /// All samples in file order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Consume the dataset, returning its samples
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    /// Parse a single line in libsvm format
    fn parse_line(line: &str) -> Result<Sample> {
        let mut parts = line.split_whitespace();

        let label_str = parts
            .next()
            .ok_or_else(|| SVMError::ParseError("Empty line".to_string()))?;
        let label = label_str
            .parse::<f64>()
            .map_err(|_| SVMError::ParseError(format!("Invalid label: {label_str}")))?;
        if !label.is_finite() {
            return Err(SVMError::InvalidLabel(label));
        }

        let mut indices = Vec::new();
        let mut values = Vec::new();

        for feature_str in parts {
            let (index_str, value_str) = feature_str.split_once(':').ok_or_else(|| {
                SVMError::ParseError(format!("Invalid feature format: {feature_str}"))
            })?;

            let index = index_str.parse::<usize>().map_err(|_| {
                SVMError::ParseError(format!("Invalid feature index: {index_str}"))
            })?;

            let value = value_str.parse::<f64>().map_err(|_| {
                SVMError::ParseError(format!("Invalid feature value: {value_str}"))
            })?;

            // libsvm uses 1-based indexing, convert to 0-based
            if index == 0 {
                return Err(SVMError::ParseError(
                    "Feature index must be positive: 0".to_string(),
                ));
            }

            indices.push(index - 1);
            values.push(value);
        }

        Ok(Sample::new(SparseVector::new(indices, values), label))
    }
}

impl Dataset for LibSVMDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.dimensions
    }

    fn get_sample(&self, i: usize) -> Sample {
        self.samples[i].clone()
    }

    fn get_labels(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_line_basic() {
        let sample = LibSVMDataset::parse_line("+1 1:0.5 3:1.2").unwrap();

        assert_eq!(sample.label, 1.0);
        assert_eq!(sample.features.indices, vec![0, 2]); // 1-based to 0-based
        assert_eq!(sample.features.values, vec![0.5, 1.2]);
    }

    #[test]
    fn test_parse_line_keeps_label() {
        let sample = LibSVMDataset::parse_line("3 1:1.0").unwrap();
        assert_eq!(sample.label, 3.0);

        let sample = LibSVMDataset::parse_line("-2.5 4:1.0").unwrap();
        assert_eq!(sample.label, -2.5);
        assert_eq!(sample.features.indices, vec![3]);
    }

    #[test]
    fn test_parse_line_without_features() {
        let sample = LibSVMDataset::parse_line("1").unwrap();
        assert!(sample.features.is_empty());
    }

    #[test]
    fn test_parse_line_invalid_format() {
        // Invalid feature format
        assert!(LibSVMDataset::parse_line("+1 1").is_err());

        // Invalid index
        assert!(LibSVMDataset::parse_line("+1 abc:1.0").is_err());

        // Invalid value
        assert!(LibSVMDataset::parse_line("+1 1:abc").is_err());

        // Zero index (libsvm is 1-based)
        assert!(LibSVMDataset::parse_line("+1 0:1.0").is_err());

        // Non-finite label
        assert!(matches!(
            LibSVMDataset::parse_line("nan 1:1.0"),
            Err(SVMError::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_from_reader_basic() {
        let data = "+1 1:0.5 3:1.2\n-1 2:0.3 5:2.1\n";
        let dataset = LibSVMDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 5); // max index is 4 (0-based), so dimension is 5

        let sample1 = dataset.get_sample(0);
        assert_eq!(sample1.label, 1.0);
        assert_eq!(sample1.features.indices, vec![0, 2]);

        let sample2 = dataset.get_sample(1);
        assert_eq!(sample2.label, -1.0);
        assert_eq!(sample2.features.indices, vec![1, 4]);
    }

    #[test]
    fn test_from_reader_multiclass() {
        let data = "1 1:1.0\n2 2:1.0\n3 3:1.0\n2 2:0.5\n";
        let dataset = LibSVMDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.get_labels(), vec![1.0, 2.0, 3.0, 2.0]);
        assert_eq!(dataset.samples().len(), 4);
        assert_eq!(dataset.dim(), 3);
    }

    #[test]
    fn test_from_reader_empty_lines_and_comments() {
        let data = "# Comment line\n+1 1:0.5\n\n# Another comment\n-1 2:0.3\n";
        let dataset = LibSVMDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_from_reader_reports_line_number() {
        let data = "+1 1:0.5\n-1 2:x\n";
        let err = LibSVMDataset::from_reader(Cursor::new(data)).unwrap_err();

        match err {
            SVMError::ParseError(message) => assert!(message.contains("line 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_reader_empty_dataset() {
        let data = "# Only comments\n\n";
        let result = LibSVMDataset::from_reader(Cursor::new(data));
        assert!(matches!(result, Err(SVMError::EmptyDataset)));
    }

    #[test]
    fn test_dataset_trait_implementation() {
        let data = "+1 1:0.5 3:1.2\n-1 2:0.3\n";
        let dataset = LibSVMDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 3);
        assert!(!dataset.is_empty());

        let batch = dataset.get_batch(&[0, 1]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].label, 1.0);
        assert_eq!(batch[1].label, -1.0);
    }

    #[test]
    fn test_large_dimension_handling() {
        let data = "+1 1:1.0 1000:2.0 5000:3.0\n-1 2:1.0 500:2.0\n";
        let dataset = LibSVMDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 5000);

        let sample = dataset.get_sample(0);
        assert_eq!(sample.features.indices, vec![0, 999, 4999]);
        assert_eq!(sample.features.values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "2 1:0.5 3:1.2").expect("Failed to write");
        writeln!(temp_file, "4 2:0.3 5:2.1").expect("Failed to write");
        temp_file.flush().expect("Failed to flush");

        let dataset = LibSVMDataset::from_file(temp_file.path()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 5);
        assert_eq!(dataset.into_samples()[1].label, 4.0);
    }

    #[test]
    fn test_from_file_io_error() {
        let result = LibSVMDataset::from_file("/non/existent/file.libsvm");
        assert!(matches!(result.unwrap_err(), SVMError::IoError(_)));
    }
}
