use anyhow::{Context as AnyhowContext, Result};
use deid_protocol::{serialize_json, MaskedRecord, Record};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Open `path` for reading; `-` is stdin.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Open `path` for writing; `-` is stdout.
pub fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Parse JSON Lines records. Blank lines are skipped; any other unparsable
/// line aborts with its 1-based line number.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(&line)
            .with_context(|| format!("Invalid record on line {}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_records<W: Write>(mut writer: W, records: &[MaskedRecord], pretty: bool) -> Result<()> {
    for record in records {
        writeln!(writer, "{}", serialize_json(record, pretty)?)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_lines_and_skips_blanks() {
        let input = "{\"id\":1,\"text\":\"a\"}\n\n{\"id\":2,\"text\":\"b\",\"src\":\"chat\"}\n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text, "b");
        assert_eq!(records[1].extra["src"], "chat");
    }

    #[test]
    fn reports_bad_line_number() {
        let input = "{\"id\":1,\"text\":\"a\"}\nnot json\n";
        let err = read_records(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn writes_one_line_per_record() {
        let record = Record::new(1, "plain");
        let out = MaskedRecord::masked(&record, "plain".into(), Vec::new(), 0);
        let mut buf = Vec::new();
        write_records(&mut buf, &[out.clone(), out], false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.contains("\"status\":\"masked\"")));
    }
}
