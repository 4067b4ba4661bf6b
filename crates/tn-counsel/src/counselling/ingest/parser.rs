use super::normalizer::normalize_cell;
use super::IngestError;
use crate::counselling::domain::{
    Branch, BranchCode, College, CollegeCode, CutoffRecord, DepartmentId, District, DistrictId,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;

pub(crate) const DISTRICT_ID: &str = "District ID";
pub(crate) const COLLEGE_CODE: &str = "College code";
pub(crate) const BRANCH_CODE: &str = "Branch Code";
pub(crate) const DEPARTMENT_ID: &str = "Department ID";
pub(crate) const OC_CUTOFF: &str = "Catogery OC Cutoff";
pub(crate) const YEAR: &str = "Year";

const COLLEGE_COLUMNS: &[&str] = &[COLLEGE_CODE, "College Code", "College Name", DISTRICT_ID];

#[derive(Debug, Deserialize)]
struct DistrictRow {
    #[serde(rename = "District ID")]
    district_id: String,
    #[serde(rename = "District", alias = "District Name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CollegeRow {
    #[serde(rename = "College code", alias = "College Code")]
    college_code: String,
    #[serde(rename = "College Name")]
    name: String,
    #[serde(
        rename = "District ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    district_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BranchRow {
    #[serde(rename = "Branch Code")]
    branch_code: String,
    #[serde(rename = "Branch Name")]
    name: String,
    #[serde(
        rename = "Department ID",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    department_id: Option<String>,
    #[serde(
        rename = "Department",
        alias = "Department Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    department_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CutoffRow {
    #[serde(rename = "District ID")]
    district_id: String,
    #[serde(rename = "College code", alias = "College Code")]
    college_code: String,
    #[serde(rename = "Branch Code")]
    branch_code: String,
    #[serde(rename = "Department ID")]
    department_id: String,
    #[serde(
        rename = "Catogery OC Cutoff",
        alias = "Category OC Cutoff",
        alias = "OC Cutoff"
    )]
    oc_cutoff: String,
    #[serde(rename = "Year", default, deserialize_with = "empty_string_as_none")]
    year: Option<String>,
}

/// Deserialized row plus the header-aligned raw record and its 1-based line.
struct SourceRow<T> {
    line: u64,
    row: T,
    headers: csv::StringRecord,
    record: csv::StringRecord,
}

fn read_rows<T, R>(reader: R, file: &'static str) -> Result<Vec<SourceRow<T>>, IngestError>
where
    T: DeserializeOwned,
    R: Read,
{
    let csv_error = |source| IngestError::Csv { file, source };
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: csv::StringRecord = csv_reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_cell)
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map_or(0, |position| position.line());
        let row = record
            .deserialize::<T>(Some(&headers))
            .map_err(csv_error)?;
        rows.push(SourceRow {
            line,
            row,
            headers: headers.clone(),
            record,
        });
    }

    Ok(rows)
}

fn required_key(
    value: &str,
    file: &'static str,
    line: u64,
    column: &'static str,
) -> Result<String, IngestError> {
    let key = normalize_cell(value);
    if key.is_empty() {
        return Err(IngestError::MissingKey { file, line, column });
    }
    Ok(key)
}

pub(crate) fn parse_districts<R: Read>(
    reader: R,
    file: &'static str,
) -> Result<Vec<District>, IngestError> {
    read_rows::<DistrictRow, _>(reader, file)?
        .into_iter()
        .map(|source| {
            Ok(District {
                district_id: DistrictId(required_key(
                    &source.row.district_id,
                    file,
                    source.line,
                    DISTRICT_ID,
                )?),
                name: normalize_cell(&source.row.name),
            })
        })
        .collect()
}

pub(crate) fn parse_colleges<R: Read>(
    reader: R,
    file: &'static str,
) -> Result<Vec<College>, IngestError> {
    read_rows::<CollegeRow, _>(reader, file)?
        .into_iter()
        .map(|source| {
            let metadata: BTreeMap<String, String> = source
                .headers
                .iter()
                .zip(source.record.iter())
                .filter(|(header, value)| {
                    !header.is_empty()
                        && !COLLEGE_COLUMNS.contains(header)
                        && !value.trim().is_empty()
                })
                .map(|(header, value)| (header.to_string(), normalize_cell(value)))
                .collect();

            Ok(College {
                college_code: CollegeCode(required_key(
                    &source.row.college_code,
                    file,
                    source.line,
                    COLLEGE_CODE,
                )?),
                name: normalize_cell(&source.row.name),
                district_id: source
                    .row
                    .district_id
                    .as_deref()
                    .map(|id| DistrictId(normalize_cell(id))),
                metadata,
            })
        })
        .collect()
}

pub(crate) fn parse_branches<R: Read>(
    reader: R,
    file: &'static str,
) -> Result<Vec<Branch>, IngestError> {
    read_rows::<BranchRow, _>(reader, file)?
        .into_iter()
        .map(|source| {
            Ok(Branch {
                branch_code: BranchCode(required_key(
                    &source.row.branch_code,
                    file,
                    source.line,
                    BRANCH_CODE,
                )?),
                name: normalize_cell(&source.row.name),
                department_id: source
                    .row
                    .department_id
                    .as_deref()
                    .map(|id| DepartmentId(normalize_cell(id))),
                department_name: source.row.department_name.as_deref().map(normalize_cell),
            })
        })
        .collect()
}

pub(crate) fn parse_cutoffs<R: Read>(
    reader: R,
    file: &'static str,
    default_year: u16,
) -> Result<Vec<CutoffRecord>, IngestError> {
    read_rows::<CutoffRow, _>(reader, file)?
        .into_iter()
        .map(|source| {
            let line = source.line;
            let row = source.row;
            Ok(CutoffRecord {
                district_id: DistrictId(required_key(&row.district_id, file, line, DISTRICT_ID)?),
                college_code: CollegeCode(required_key(
                    &row.college_code,
                    file,
                    line,
                    COLLEGE_CODE,
                )?),
                branch_code: BranchCode(required_key(&row.branch_code, file, line, BRANCH_CODE)?),
                department_id: DepartmentId(required_key(
                    &row.department_id,
                    file,
                    line,
                    DEPARTMENT_ID,
                )?),
                oc_cutoff: parse_cutoff(&row.oc_cutoff, file, line)?,
                year: match row.year.as_deref() {
                    Some(raw) => parse_year(raw, file, line)?,
                    None => default_year,
                },
            })
        })
        .collect()
}

fn parse_cutoff(raw: &str, file: &'static str, line: u64) -> Result<f64, IngestError> {
    normalize_cell(raw)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| IngestError::MalformedValue {
            file,
            line,
            column: OC_CUTOFF,
            value: raw.to_string(),
        })
}

fn parse_year(raw: &str, file: &'static str, line: u64) -> Result<u16, IngestError> {
    normalize_cell(raw)
        .parse::<u16>()
        .map_err(|_| IngestError::MalformedValue {
            file,
            line,
            column: YEAR,
            value: raw.to_string(),
        })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn cutoff_rows_accept_padded_headers_and_fractional_values() {
        let csv = " District ID , College code ,Branch Code,Department ID, Catogery OC Cutoff \n\
1,1,CS,1, 199.75 \n";
        let records = parse_cutoffs(Cursor::new(csv), "Cutoff.csv", 2020).expect("parse");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].oc_cutoff, 199.75);
        assert_eq!(records[0].year, 2020);
        assert_eq!(records[0].branch_code.as_str(), "CS");
    }

    #[test]
    fn explicit_year_column_wins() {
        let csv = "District ID,College code,Branch Code,Department ID,Category OC Cutoff,Year\n\
1,1,CS,1,180,2021\n";
        let records = parse_cutoffs(Cursor::new(csv), "Cutoff.csv", 2020).expect("parse");
        assert_eq!(records[0].year, 2021);
    }

    #[test]
    fn non_numeric_cutoff_is_rejected_with_line() {
        let csv = "District ID,College code,Branch Code,Department ID,Catogery OC Cutoff\n\
1,1,CS,1,180\n\
1,2,CS,1,n/a\n";
        let error = parse_cutoffs(Cursor::new(csv), "Cutoff.csv", 2020).expect_err("malformed");

        match error {
            IngestError::MalformedValue {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, OC_CUTOFF);
                assert_eq!(value, "n/a");
            }
            other => panic!("expected malformed value, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_cutoff_is_rejected() {
        let csv = "District ID,College code,Branch Code,Department ID,Catogery OC Cutoff\n\
1,1,CS,1,NaN\n";
        assert!(matches!(
            parse_cutoffs(Cursor::new(csv), "Cutoff.csv", 2020),
            Err(IngestError::MalformedValue { .. })
        ));
    }

    #[test]
    fn empty_join_key_is_rejected() {
        let csv = "District ID,College code,Branch Code,Department ID,Catogery OC Cutoff\n\
1,,CS,1,180\n";
        let error = parse_cutoffs(Cursor::new(csv), "Cutoff.csv", 2020).expect_err("missing");
        match error {
            IngestError::MissingKey { column, line, .. } => {
                assert_eq!(column, COLLEGE_CODE);
                assert_eq!(line, 2);
            }
            other => panic!("expected missing key, got {other:?}"),
        }
    }

    #[test]
    fn college_extra_columns_become_metadata() {
        let csv = "College code,College Name,District ID,Address,Website\n\
1,  Anna   University ,1,Guindy Chennai,\n";
        let colleges = parse_colleges(Cursor::new(csv), "Colleges-info.csv").expect("parse");

        assert_eq!(colleges[0].name, "Anna University");
        assert_eq!(
            colleges[0].district_id.as_ref().map(DistrictId::as_str),
            Some("1")
        );
        assert_eq!(
            colleges[0].metadata.get("Address").map(String::as_str),
            Some("Guindy Chennai")
        );
        assert!(!colleges[0].metadata.contains_key("Website"));
    }

    #[test]
    fn branch_department_columns_are_optional() {
        let csv = "Branch Code,Branch Name\nCS,Computer Science\n";
        let branches = parse_branches(Cursor::new(csv), "Branches.csv").expect("parse");
        assert!(branches[0].department_id.is_none());
        assert!(branches[0].department_name.is_none());
    }

    #[test]
    fn bom_prefixed_header_is_recognized() {
        let csv = "\u{feff}District ID,District\n1,Chennai\n";
        let districts = parse_districts(Cursor::new(csv), "Districts.csv").expect("parse");
        assert_eq!(districts[0].district_id.as_str(), "1");
        assert_eq!(districts[0].name, "Chennai");
    }
}
