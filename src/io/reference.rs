use std::path::Path;

use csv::StringRecord;
use tracing::info;

use crate::error::{ClassifierError, Result};
use crate::models::{ConnectionStatus, DispositionRecord, GrievanceRecord};

/// Immutable reference data shared by every request
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    dispositions: Vec<DispositionRecord>,
    grievances: Vec<GrievanceRecord>,
}

impl ReferenceTables {
    pub fn new(dispositions: Vec<DispositionRecord>, grievances: Vec<GrievanceRecord>) -> Self {
        Self {
            dispositions,
            grievances,
        }
    }

    /// Load both tables; any failure here should stop the process
    pub fn load(dispositions_path: &Path, grievances_path: &Path) -> Result<Self> {
        let dispositions = load_dispositions(dispositions_path)?;
        let grievances = load_grievances(grievances_path)?;

        info!(
            "Loaded {} dispositions from {:?}, {} grievance subcategories from {:?}",
            dispositions.len(),
            dispositions_path,
            grievances.len(),
            grievances_path
        );

        Ok(Self::new(dispositions, grievances))
    }

    pub fn dispositions(&self) -> &[DispositionRecord] {
        &self.dispositions
    }

    pub fn grievances(&self) -> &[GrievanceRecord] {
        &self.grievances
    }

    /// Dispositions for one status group, in table order
    pub fn filter_by_status(&self, status: ConnectionStatus) -> Vec<&DispositionRecord> {
        self.dispositions
            .iter()
            .filter(|d| d.connected_status == status)
            .collect()
    }

    /// Full table rendering, numbered across both status groups
    pub fn render_dispositions(&self) -> String {
        render_dispositions(self.dispositions.iter())
    }

    /// Rendering of a single status group, numbered from 1
    pub fn render_status_group(&self, status: ConnectionStatus) -> String {
        render_dispositions(self.filter_by_status(status))
    }

    pub fn render_grievances(&self) -> String {
        render_grievances(self.grievances.iter())
    }

    pub fn grievance_codes(&self) -> Vec<&str> {
        self.grievances
            .iter()
            .map(|g| g.subcategory_code.as_str())
            .collect()
    }
}

/// `N. CODE: … | STATUS: … | LABEL: … | DESC: …`, one line per record
pub fn render_dispositions<'a>(records: impl IntoIterator<Item = &'a DispositionRecord>) -> String {
    records
        .into_iter()
        .enumerate()
        .map(|(i, d)| {
            format!(
                "{}. CODE: {} | STATUS: {} | LABEL: {} | DESC: {}",
                i + 1,
                d.code,
                d.connected_status,
                d.label,
                d.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `N. CODE: … | LABEL: … | DESC: …`, one line per record
pub fn render_grievances<'a>(records: impl IntoIterator<Item = &'a GrievanceRecord>) -> String {
    records
        .into_iter()
        .enumerate()
        .map(|(i, g)| {
            format!(
                "{}. CODE: {} | LABEL: {} | DESC: {}",
                i + 1,
                g.subcategory_code,
                g.subcategory_label,
                g.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Load the general disposition table (status, code, label, description)
pub fn load_dispositions(path: &Path) -> Result<Vec<DispositionRecord>> {
    let rows = read_rows(path)?;
    let mut records = Vec::with_capacity(rows.len());

    for (line, row) in rows.iter().enumerate() {
        let [status, code, label, description] = columns(path, line, row)?;
        let connected_status = status
            .parse::<ConnectionStatus>()
            .map_err(|e| ClassifierError::reference(path, format!("row {}: {}", line + 1, e)))?;

        records.push(DispositionRecord {
            connected_status,
            code,
            label,
            description,
        });
    }

    Ok(records)
}

/// Load the grievance table (parent code, subcategory code, label, description)
pub fn load_grievances(path: &Path) -> Result<Vec<GrievanceRecord>> {
    let rows = read_rows(path)?;

    rows.iter()
        .enumerate()
        .map(|(line, row)| -> Result<GrievanceRecord> {
            let [parent_code, subcategory_code, subcategory_label, description] =
                columns(path, line, row)?;
            Ok(GrievanceRecord {
                parent_code,
                subcategory_code,
                subcategory_label,
                description,
            })
        })
        .collect()
}

fn read_rows(path: &Path) -> Result<Vec<StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ClassifierError::reference(path, e))?;

    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ClassifierError::reference(path, e))?;

    if rows.is_empty() {
        return Err(ClassifierError::reference(path, "table has no rows"));
    }

    Ok(rows)
}

/// First four columns of a row; columns are positional, header names are ignored
fn columns(path: &Path, line: usize, row: &StringRecord) -> Result<[String; 4]> {
    let get = |i: usize| {
        row.get(i).map(str::to_string).ok_or_else(|| {
            ClassifierError::reference(
                path,
                format!("row {}: expected 4 columns, found {}", line + 1, row.len()),
            )
        })
    };

    Ok([get(0)?, get(1)?, get(2)?, get(3)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const DISPOSITIONS: &str = "\
connected_status,disposition_code,disposition_label,disposition_description
Connected,PTP_ON_SPECIFIC_DATE,Promise to pay,Customer promises to pay on a date
Connected,GRIEVANCE,Grievance,Customer raises a complaint
Not Connected,NO_ANSWER,No answer,Phone rang without answer
";

    const GRIEVANCES: &str = "\
parent_code,sub_category_code,sub_category_label,description
GRIEVANCE,LOAN_CLOSURE_ISSUE,Loan closure,\"Closure not processed, NOC pending\"
GRIEVANCE,EXCESS_CHARGES,Excess charges,Unexpected fees
";

    fn tables() -> ReferenceTables {
        let d = write_csv(DISPOSITIONS);
        let g = write_csv(GRIEVANCES);
        ReferenceTables::load(d.path(), g.path()).unwrap()
    }

    #[test]
    fn test_load_tables() {
        let tables = tables();

        assert_eq!(tables.dispositions().len(), 3);
        assert_eq!(tables.dispositions()[2].connected_status, ConnectionStatus::NotConnected);
        assert_eq!(tables.grievances().len(), 2);
        assert_eq!(tables.grievances()[0].description, "Closure not processed, NOC pending");
        assert_eq!(tables.grievance_codes(), vec!["LOAN_CLOSURE_ISSUE", "EXCESS_CHARGES"]);
    }

    #[test]
    fn test_render_full_table() {
        let rendered = tables().render_dispositions();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "1. CODE: PTP_ON_SPECIFIC_DATE | STATUS: Connected | LABEL: Promise to pay | DESC: Customer promises to pay on a date"
        );
        assert!(lines[2].starts_with("3. CODE: NO_ANSWER | STATUS: Not Connected"));
    }

    #[test]
    fn test_filtered_rendering_renumbers() {
        let rendered = tables().render_status_group(ConnectionStatus::NotConnected);
        assert_eq!(
            rendered,
            "1. CODE: NO_ANSWER | STATUS: Not Connected | LABEL: No answer | DESC: Phone rang without answer"
        );
    }

    #[test]
    fn test_render_grievances() {
        let rendered = tables().render_grievances();
        assert!(rendered.starts_with("1. CODE: LOAN_CLOSURE_ISSUE | LABEL: Loan closure | DESC:"));
        assert!(rendered.contains("\n2. CODE: EXCESS_CHARGES"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = load_dispositions(Path::new("/nonexistent/General_disposition.csv"));
        assert!(matches!(result, Err(ClassifierError::ReferenceData { .. })));
    }

    #[test]
    fn test_unknown_status_is_error() {
        let file = write_csv("status,code,label,desc\nMaybe,X,Y,Z\n");
        let err = load_dispositions(file.path()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_short_row_is_error() {
        let file = write_csv("a,b\nx,y\n");
        assert!(load_grievances(file.path()).is_err());
    }

    #[test]
    fn test_empty_table_is_error() {
        let file = write_csv("status,code,label,desc\n");
        assert!(load_dispositions(file.path()).is_err());
    }
}
