use crate::model::{Configuration, Member, ShiftEntry};
use anyhow::{bail, Context};
use csv::WriterBuilder;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P, what: &str) -> anyhow::Result<T> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing {what} {}", path.display()))
}

/// Charge une configuration de rotation et la valide.
pub fn load_configuration<P: AsRef<Path>>(path: P) -> anyhow::Result<Configuration> {
    let cfg: Configuration = read_json(path, "configuration")?;
    if let Err(msg) = cfg.validate() {
        bail!("invalid configuration {:?}: {msg}", cfg.name);
    }
    Ok(cfg)
}

/// Charge une liste de membres (tableau JSON).
pub fn load_members<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Member>> {
    read_json(path, "members")
}

/// Charge un historique d'occurrences, trié par début.
pub fn load_shifts<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftEntry>> {
    let mut shifts: Vec<ShiftEntry> = read_json(path, "shifts")?;
    shifts.sort_by_key(|s| s.start);
    Ok(shifts)
}

/// Export JSON des occurrences (écriture atomique).
pub fn export_shifts_json<P: AsRef<Path>>(path: P, shifts: &[ShiftEntry]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(shifts)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}

/// Export CSV des occurrences : header `name,start,end,on_call,comment`,
/// les emails d'astreinte séparés par `;`.
pub fn write_shifts_csv<W: Write>(out: W, shifts: &[ShiftEntry]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
    w.write_record(["name", "start", "end", "on_call", "comment"])?;
    for s in shifts {
        let on_call = s.emails().collect::<Vec<_>>().join(";");
        let start = s.start.to_rfc3339();
        let end = s.end.to_rfc3339();
        w.write_record([
            s.name.as_str(),
            start.as_str(),
            end.as_str(),
            on_call.as_str(),
            s.comment.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_shifts_csv<P: AsRef<Path>>(path: P, shifts: &[ShiftEntry]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_shifts_csv(file, shifts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShiftMember;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    fn sample() -> Vec<ShiftEntry> {
        let t0 = Utc.with_ymd_and_hms(2006, 4, 1, 0, 0, 0).unwrap();
        let mut e = ShiftEntry::new("main", t0, t0 + Duration::days(5));
        e.on_call = vec![
            ShiftMember::new("A@A.com", "main"),
            ShiftMember::new("B@B.com", "main"),
        ];
        vec![e]
    }

    #[test]
    fn csv_export_lists_assignees() {
        let mut buf = Vec::new();
        write_shifts_csv(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        insta::assert_snapshot!(text, @r###"
        name,start,end,on_call,comment
        main,2006-04-01T00:00:00+00:00,2006-04-06T00:00:00+00:00,A@A.com;B@B.com,
        "###);
    }

    #[test]
    fn json_export_reloads_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shifts.json");
        let mut shifts = sample();
        let mut later = shifts[0].clone();
        later.start += Duration::days(7);
        later.end += Duration::days(7);
        shifts.insert(0, later);

        export_shifts_json(&path, &shifts).unwrap();
        let loaded = load_shifts(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded[0].start < loaded[1].start);
        assert_eq!(loaded[0].on_call.len(), 2);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rota.json");
        fs::write(
            &path,
            r#"{"name":"x","config":{"length":5,"shifts":[],"shift_members":1,"generator":"Fair"}}"#,
        )
        .unwrap();
        let err = load_configuration(&path).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
    }
}
