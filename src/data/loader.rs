use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{AccidentDataset, AccidentRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an accident dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat schema with one column per record field (recommended)
/// * `.json`    – `[{ "uf": "SP", "mes": "Janeiro", ... }, ...]`
/// * `.csv`     – semicolon-delimited PRF export, comma decimal separators
pub fn load_file(path: &Path) -> Result<AccidentDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Field parsing helpers, shared across formats
// ---------------------------------------------------------------------------

/// Extract the hour from a `HH:MM` or `HH:MM:SS` time-of-day string.
fn parse_hour(s: &str) -> Result<u8> {
    let hh = s
        .split(':')
        .next()
        .unwrap_or("")
        .trim();
    let hour: u8 = hh
        .parse()
        .with_context(|| format!("'{s}' is not a HH:MM[:SS] time"))?;
    if hour > 23 {
        bail!("'{s}': hour {hour} out of range");
    }
    Ok(hour)
}

/// Parse a coordinate that may use a comma as the decimal separator.
/// Empty cells mean the row was never geocoded.
fn parse_coord(s: &str) -> Result<Option<f64>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let normalised = s.replace(',', ".");
    let value: f64 = normalised
        .parse()
        .with_context(|| format!("'{s}' is not a coordinate"))?;
    Ok(Some(value))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: the PRF (datatran) export convention — semicolon-delimited,
/// header row with columns `uf`, `municipio`, `mes`, `horario`,
/// `causa_acidente`, `mortos`, and optionally `latitude` / `longitude`
/// written with comma decimal separators.
fn load_csv(path: &Path) -> Result<AccidentDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

fn read_csv<R: Read>(input: R) -> Result<AccidentDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let required = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let uf_idx = required("uf")?;
    let mun_idx = required("municipio")?;
    let month_idx = required("mes")?;
    let time_idx = required("horario")?;
    let cause_idx = required("causa_acidente")?;
    let deaths_idx = required("mortos")?;
    // Coordinates are optional; PRF files before 2017 lack them entirely.
    let lat_idx = headers.iter().position(|h| h == "latitude");
    let lon_idx = headers.iter().position(|h| h == "longitude");

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let hour = parse_hour(field(time_idx)).with_context(|| format!("CSV row {row_no}"))?;
        let fatalities: u64 = field(deaths_idx)
            .parse()
            .with_context(|| format!("CSV row {row_no}: 'mortos' is not a count"))?;
        let latitude = match lat_idx {
            Some(idx) => parse_coord(field(idx)).with_context(|| format!("CSV row {row_no}"))?,
            None => None,
        };
        let longitude = match lon_idx {
            Some(idx) => parse_coord(field(idx)).with_context(|| format!("CSV row {row_no}"))?,
            None => None,
        };

        records.push(AccidentRecord {
            uf: field(uf_idx).to_string(),
            municipality: field(mun_idx).to_string(),
            month: field(month_idx).to_string(),
            hour,
            cause: field(cause_idx).to_string(),
            fatalities,
            latitude,
            longitude,
        });
    }

    Ok(AccidentDataset::from_records(records)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One record as serialised by `df.to_json(orient='records')` over the
/// cleaned source table. Coordinates are plain JSON numbers here.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    uf: String,
    municipio: String,
    mes: String,
    horario: String,
    causa_acidente: String,
    mortos: u64,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

fn load_json(path: &Path) -> Result<AccidentDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<AccidentDataset> {
    let raw: Vec<JsonRecord> = serde_json::from_str(text).context("parsing JSON")?;

    let mut records = Vec::with_capacity(raw.len());
    for (i, rec) in raw.into_iter().enumerate() {
        let hour = parse_hour(&rec.horario).with_context(|| format!("JSON record {i}"))?;
        records.push(AccidentRecord {
            uf: rec.uf,
            municipality: rec.municipio,
            month: rec.mes,
            hour,
            cause: rec.causa_acidente,
            fatalities: rec.mortos,
            latitude: rec.latitude,
            longitude: rec.longitude,
        });
    }

    Ok(AccidentDataset::from_records(records)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with a flat accident schema.
///
/// Expected columns:
/// - `uf`, `municipio`, `mes`, `horario`, `causa_acidente`: Utf8
/// - `mortos`: Int64
/// - `latitude`, `longitude`: nullable Float64 (optional columns)
fn load_parquet(path: &Path) -> Result<AccidentDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let uf = utf8_column(&batch, "uf")?;
        let municipality = utf8_column(&batch, "municipio")?;
        let month = utf8_column(&batch, "mes")?;
        let time = utf8_column(&batch, "horario")?;
        let cause = utf8_column(&batch, "causa_acidente")?;
        let fatalities = int64_column(&batch, "mortos")?;
        let latitude = optional_f64_column(&batch, "latitude")?;
        let longitude = optional_f64_column(&batch, "longitude")?;

        for row in 0..batch.num_rows() {
            let hour = parse_hour(time.value(row))
                .with_context(|| format!("parquet row {row}: 'horario'"))?;
            let deaths = fatalities.value(row);
            if deaths < 0 {
                bail!("parquet row {row}: negative 'mortos' count {deaths}");
            }

            records.push(AccidentRecord {
                uf: uf.value(row).to_string(),
                municipality: municipality.value(row).to_string(),
                month: month.value(row).to_string(),
                hour,
                cause: cause.value(row).to_string(),
                fatalities: deaths as u64,
                latitude: nullable_value(latitude, row),
                longitude: nullable_value(longitude, row),
            });
        }
    }

    Ok(AccidentDataset::from_records(records)?)
}

// -- Arrow column helpers --

fn utf8_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow!("Parquet file missing '{name}' column"))?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .with_context(|| format!("Parquet column '{name}' is not Utf8"))
}

fn int64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow!("Parquet file missing '{name}' column"))?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<Int64Array>()
        .with_context(|| format!("Parquet column '{name}' is not Int64"))
}

/// Coordinates may be missing as a whole column or null per-row.
fn optional_f64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<Option<&'a Float64Array>> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<Float64Array>()
        .with_context(|| format!("Parquet column '{name}' is not Float64"))
        .map(Some)
}

fn nullable_value(col: Option<&Float64Array>, row: usize) -> Option<f64> {
    let arr = col?;
    if arr.is_null(row) {
        None
    } else {
        Some(arr.value(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
uf;municipio;mes;horario;causa_acidente;mortos;latitude;longitude
SP;SAO PAULO;Janeiro;06:45:30;Excesso de velocidade;1;-23,5505;-46,6333
RJ;RIO DE JANEIRO;Fevereiro;18:10:00;Chuva;0;;
";

    #[test]
    fn reads_prf_style_csv() {
        let ds = read_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.records[0];
        assert_eq!(first.uf, "SP");
        assert_eq!(first.municipality, "SAO PAULO");
        assert_eq!(first.month, "Janeiro");
        assert_eq!(first.hour, 6);
        assert_eq!(first.cause, "Excesso de velocidade");
        assert_eq!(first.fatalities, 1);
        assert_eq!(first.latitude, Some(-23.5505));
        assert_eq!(first.longitude, Some(-46.6333));

        // Empty coordinate cells become None, not an error.
        let second = &ds.records[1];
        assert_eq!(second.hour, 18);
        assert_eq!(second.latitude, None);
        assert_eq!(second.longitude, None);
    }

    #[test]
    fn csv_missing_required_column_is_an_error() {
        let csv = "uf;municipio;mes;horario;mortos\nSP;X;Janeiro;10:00;0\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("causa_acidente"));
    }

    #[test]
    fn csv_with_unknown_month_fails_loudly() {
        let csv = "\
uf;municipio;mes;horario;causa_acidente;mortos
SP;SAO PAULO;Smarch;06:00;Chuva;0
";
        assert!(read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn parse_hour_accepts_hms_and_hm() {
        assert_eq!(parse_hour("06:45:30").unwrap(), 6);
        assert_eq!(parse_hour("23:59").unwrap(), 23);
        assert_eq!(parse_hour("0:05").unwrap(), 0);
        assert!(parse_hour("24:00").is_err());
        assert!(parse_hour("noon").is_err());
    }

    #[test]
    fn parse_coord_handles_comma_decimals_and_blanks() {
        assert_eq!(parse_coord("-23,5505").unwrap(), Some(-23.5505));
        assert_eq!(parse_coord("-46.6333").unwrap(), Some(-46.6333));
        assert_eq!(parse_coord("").unwrap(), None);
        assert!(parse_coord("n/a").is_err());
    }

    #[test]
    fn reads_records_oriented_json() {
        let json = r#"[
            {"uf": "SP", "municipio": "SAO PAULO", "mes": "Janeiro",
             "horario": "06:45:30", "causa_acidente": "Excesso de velocidade",
             "mortos": 1, "latitude": -23.5505, "longitude": -46.6333},
            {"uf": "RJ", "municipio": "RIO DE JANEIRO", "mes": "Fevereiro",
             "horario": "18:10:00", "causa_acidente": "Chuva", "mortos": 0}
        ]"#;
        let ds = read_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].latitude, Some(-23.5505));
        assert_eq!(ds.records[1].latitude, None);
        assert_eq!(ds.regions, vec!["RJ", "SP"]);
        assert_eq!(ds.months, vec!["Janeiro", "Fevereiro"]);
    }
}
