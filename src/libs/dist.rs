//! Mash distance tables and the per-chromosome subgenome filter.
//!
//! Raw tables are `mash dist` output, one row per reference/query shard pair:
//! reference-path, query-path, distance, p-value, matching-hashes. Filtered
//! tables keep, for each reference chromosome, the K closest query
//! chromosomes, ranked `SG1`..`SGk` by ascending distance.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Header line of a filtered table.
pub const HEADER: &str = "Rchr\tQchr\tSubg\tMashD";

/// One row of `mash dist` output, reduced to the fields the filter needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DistRecord {
    pub ref_chr: String,
    pub qry_chr: String,
    pub distance: f64,
}

/// One row of a filtered table.
#[derive(Debug, Clone, PartialEq)]
pub struct SubgRecord {
    pub ref_chr: String,
    pub qry_chr: String,
    pub subg: String,
    pub distance: f64,
}

/// Base name of a shard path with the last extension stripped.
///
/// ```
/// assert_eq!(sgmash::libs::dist::file_stem("Ath_split/chr1_A.fa"), "chr1_A");
/// ```
pub fn file_stem(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Reads a distance table, raw or already filtered.
///
/// A first line starting with `Rchr\t` marks a filtered table; its rows are
/// read back as records (rank labels dropped) so that re-filtering is
/// possible. Raw rows have their paths reduced to file stems.
pub fn read_records<R: BufRead>(reader: R) -> anyhow::Result<Vec<DistRecord>> {
    let mut records = vec![];
    let mut filtered = false;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        if i == 0 && line.starts_with("Rchr\t") {
            filtered = true;
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let record = if filtered {
            if fields.len() != 4 {
                anyhow::bail!("line {}: expected 4 fields, got {}", i + 1, fields.len());
            }
            DistRecord {
                ref_chr: fields[0].to_string(),
                qry_chr: fields[1].to_string(),
                distance: parse_distance(fields[3], i + 1)?,
            }
        } else {
            if fields.len() != 5 {
                anyhow::bail!("line {}: expected 5 fields, got {}", i + 1, fields.len());
            }
            DistRecord {
                ref_chr: file_stem(fields[0]),
                qry_chr: file_stem(fields[1]),
                distance: parse_distance(fields[2], i + 1)?,
            }
        };
        records.push(record);
    }

    Ok(records)
}

/// Reads a filtered table back, rank labels included. The `Rchr` header is
/// required.
pub fn read_filtered<R: BufRead>(reader: R) -> anyhow::Result<Vec<SubgRecord>> {
    let mut records = vec![];

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        if i == 0 {
            if !line.starts_with("Rchr\t") {
                anyhow::bail!("not a filtered table: missing `Rchr` header");
            }
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 4 {
            anyhow::bail!("line {}: expected 4 fields, got {}", i + 1, fields.len());
        }
        records.push(SubgRecord {
            ref_chr: fields[0].to_string(),
            qry_chr: fields[1].to_string(),
            subg: fields[2].to_string(),
            distance: parse_distance(fields[3], i + 1)?,
        });
    }

    Ok(records)
}

fn parse_distance(field: &str, lineno: usize) -> anyhow::Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| anyhow::anyhow!("line {}: invalid distance `{}`", lineno, field))
}

/// Keeps the `n_subgenomes` closest query chromosomes per reference
/// chromosome and ranks them `SG1`..`SGk` by ascending distance.
///
/// Ties are stable by input order. Output is sorted by (reference
/// chromosome, distance). Groups smaller than `n_subgenomes` keep all their
/// rows. Empty input yields an empty table.
pub fn filter_closest(records: &[DistRecord], n_subgenomes: usize) -> Vec<SubgRecord> {
    let mut groups: BTreeMap<&str, Vec<&DistRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.ref_chr.as_str()).or_default().push(record);
    }

    let mut result = vec![];
    for (_, mut group) in groups {
        // stable sort keeps input order among equal distances
        group.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        for (i, record) in group.iter().take(n_subgenomes).enumerate() {
            result.push(SubgRecord {
                ref_chr: record.ref_chr.clone(),
                qry_chr: record.qry_chr.clone(),
                subg: format!("SG{}", i + 1),
                distance: record.distance,
            });
        }
    }

    result
}

/// Writes a filtered table, header included.
pub fn write_table<W: Write>(mut writer: W, records: &[SubgRecord]) -> anyhow::Result<()> {
    writeln!(writer, "{}", HEADER)?;
    for record in records {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            record.ref_chr, record.qry_chr, record.subg, record.distance
        )?;
    }
    Ok(())
}

/// Sort key comparing digit runs numerically, so that chr2 < chr10.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalPiece {
    Num(u64),
    Text(String),
}

pub fn natural_key(s: &str) -> Vec<NaturalPiece> {
    let mut pieces = vec![];
    let mut chars = s.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut n = 0u64;
            while let Some(&d) = chars.peek() {
                if let Some(v) = d.to_digit(10) {
                    n = n.saturating_mul(10).saturating_add(v as u64);
                    chars.next();
                } else {
                    break;
                }
            }
            pieces.push(NaturalPiece::Num(n));
        } else {
            let mut text = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    break;
                }
                text.push(d.to_ascii_lowercase());
                chars.next();
            }
            pieces.push(NaturalPiece::Text(text));
        }
    }

    pieces
}
