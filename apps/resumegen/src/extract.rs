//! Plain-text extraction from PDF résumés, for pulling content out of an
//! existing document when bootstrapping the JSON source files.

use std::path::Path;

use crate::errors::AppError;

/// Extracts the text layer of a PDF. Scanned PDFs without a text layer
/// come back (mostly) empty; there is no OCR here.
pub fn extract_text(pdf_path: &Path) -> Result<String, AppError> {
    if !pdf_path.exists() {
        return Err(AppError::MissingSource(pdf_path.to_path_buf()));
    }
    let text = pdf_extract::extract_text(pdf_path)
        .map_err(|err| AppError::Extract(format!("{}: {err}", pdf_path.display())))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_missing_file_reports_path() {
        let err = extract_text(Path::new("no/such/resume.pdf")).unwrap_err();
        assert!(err.to_string().contains("no/such/resume.pdf"));
    }
}
