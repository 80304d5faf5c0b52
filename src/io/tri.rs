use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::info;

use super::csv::read_sensitivity_csv_file;
use crate::error::{FormatError, Result};
use crate::math::{Point3, Vector3};
use crate::sensitivity::{reattach, ReattachParams, Reattachment, SensitivityTable};

/// Formats a number in C `%.14e` style: fourteen decimals, a signed
/// exponent of at least two digits (`1.00000000000000e+00`).
#[must_use]
pub fn format_scientific(value: f64) -> String {
    let formatted = format!("{value:.14e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        Err(_) => formatted,
    }
}

/// Reads the point coordinates of a tri document: the text of the first
/// `DataArray` inside `Points`, as whitespace separated triplets.
///
/// # Errors
///
/// Returns an error if the document is not well formed, has no point array,
/// or the array holds a non-numeric token or an incomplete triplet.
pub fn read_tri_points(xml: &str) -> Result<Vec<Point3>> {
    let mut reader = Reader::from_str(xml);
    let mut in_points = false;
    let mut in_array = false;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Points" => in_points = true,
                b"DataArray" if in_points => in_array = true,
                _ => {}
            },
            Event::Empty(e) if in_points && e.local_name().as_ref() == b"DataArray" => {
                return Ok(Vec::new());
            }
            Event::Text(e) if in_array => text.push_str(&e.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"DataArray" if in_array => return parse_points(&text),
                b"Points" => in_points = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Err(FormatError::Tri("no DataArray under Points".to_owned()).into())
}

fn parse_points(text: &str) -> Result<Vec<Point3>> {
    let values = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| FormatError::Tri(format!("invalid coordinate '{token}'")))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if values.len() % 3 != 0 {
        return Err(FormatError::Tri(format!(
            "{} coordinates do not form whole points",
            values.len()
        ))
        .into());
    }
    Ok(values
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}

/// Appends a `PointData` element holding one vector per point to the first
/// `Piece` of a tri document. The rest of the document is copied unchanged.
///
/// # Errors
///
/// Returns an error if the document is not well formed or has no `Piece`.
pub fn append_point_data(xml: &str, name: &str, vectors: &[Vector3]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::new());
    let mut inserted = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::End(e) if !inserted && e.local_name().as_ref() == b"Piece" => {
                write_point_data(&mut writer, name, vectors)?;
                inserted = true;
            }
            Event::Eof => break,
            _ => {}
        }
        writer.write_event(event)?;
    }

    if !inserted {
        return Err(FormatError::Tri("no Piece element".to_owned()).into());
    }
    String::from_utf8(writer.into_inner())
        .map_err(|e| FormatError::Tri(format!("output is not UTF-8: {e}")).into())
}

fn write_point_data<W: Write>(writer: &mut Writer<W>, name: &str, vectors: &[Vector3]) -> Result<()> {
    let mut body = String::from("\n ");
    for v in vectors {
        for component in v.iter() {
            body.push('\t');
            body.push_str(&format_scientific(*component));
        }
        body.push_str("\n ");
    }

    let mut array = BytesStart::new("DataArray");
    array.push_attribute(("Name", name));
    array.push_attribute(("NumberOfComponents", "3"));
    array.push_attribute(("type", "Float64"));
    array.push_attribute(("format", "ascii"));
    array.push_attribute(("TRIXtype", "SHAPE_LINEARIZATION"));

    writer.write_event(Event::Start(BytesStart::new("PointData")))?;
    writer.write_event(Event::Start(array))?;
    writer.write_event(Event::Text(BytesText::new(&body)))?;
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;
    writer.write_event(Event::End(BytesEnd::new("PointData")))?;
    Ok(())
}

/// Re-attaches sensitivity tables to the points of a tri document and
/// appends the derivatives as point data.
///
/// The data array is labelled `name`, or the first table's parameter when
/// `name` is `None`.
///
/// # Errors
///
/// Returns an error if the document is malformed, or if no label is given
/// and there are no tables to take one from.
pub fn append_sensitivities_to_tri(
    xml: &str,
    tables: &[SensitivityTable],
    name: Option<&str>,
    params: &ReattachParams,
) -> Result<(String, Reattachment)> {
    let label = match name {
        Some(name) => name,
        None => tables
            .first()
            .map(|t| t.parameter.as_str())
            .ok_or_else(|| FormatError::Tri("no sensitivity tables to label".to_owned()))?,
    };
    let points = read_tri_points(xml)?;
    let report = reattach(&points, tables, params);
    let out = append_point_data(xml, label, &report.derivatives)?;
    Ok((out, report))
}

/// Re-attaches sensitivity CSV files to a tri file and rewrites it in place.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, or is malformed.
pub fn append_sensitivities_to_tri_file<P, Q>(
    tri_path: P,
    csv_paths: &[Q],
    name: &str,
    params: &ReattachParams,
) -> Result<Reattachment>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let tables = csv_paths
        .iter()
        .map(|path| -> Result<SensitivityTable> {
            let path = path.as_ref();
            Ok(SensitivityTable {
                component: path
                    .file_stem()
                    .and_then(OsStr::to_str)
                    .unwrap_or_default()
                    .to_owned(),
                parameter: name.to_owned(),
                records: read_sensitivity_csv_file(path)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let xml = fs::read_to_string(tri_path.as_ref())?;
    let (out, report) = append_sensitivities_to_tri(&xml, &tables, Some(name), params)?;
    fs::write(tri_path.as_ref(), out)?;

    info!(
        path = %tri_path.as_ref().display(),
        tables = tables.len(),
        points = report.derivatives.len(),
        unmatched = report.unmatched.len(),
        "appended sensitivities"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::io::write_sensitivity_tables;
    use crate::sensitivity::SensitivityRecord;

    const DOC: &str = r#"<?xml version="1.0"?>
<VTKFile type="UnstructuredGrid" version="0.1" byte_order="LittleEndian">
  <UnstructuredGrid>
    <Piece NumberOfPoints="3" NumberOfCells="1">
      <Points>
        <DataArray type="Float64" NumberOfComponents="3" format="ascii">
          0 0 0
          1 0 0
          0 1 0
        </DataArray>
      </Points>
      <Cells>
        <DataArray type="Int32" Name="connectivity" format="ascii">0 1 2</DataArray>
      </Cells>
    </Piece>
  </UnstructuredGrid>
</VTKFile>
"#;

    fn span_table() -> SensitivityTable {
        let mut t = SensitivityTable::new("wing", "span");
        for (p, d) in [
            (Point3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, -0.5)),
            (Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 2.0, 0.0)),
        ] {
            t.records.push(SensitivityRecord {
                position: p,
                displacement: d,
                magnitude: d.norm(),
                derivative: d,
            });
        }
        t
    }

    #[test]
    fn scientific_format_matches_printf() {
        assert_eq!(format_scientific(1.0), "1.00000000000000e+00");
        assert_eq!(format_scientific(0.0), "0.00000000000000e+00");
        assert_eq!(format_scientific(-0.00123), "-1.23000000000000e-03");
        assert_eq!(format_scientific(2.5e100), "2.50000000000000e+100");
    }

    #[test]
    fn reads_points_in_order() {
        let points = read_tri_points(DOC).unwrap();
        assert_eq!(
            points,
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0)
            ]
        );
    }

    #[test]
    fn incomplete_triplet_rejected() {
        let doc = "<Piece><Points><DataArray>0 0 0 1</DataArray></Points></Piece>";
        assert!(read_tri_points(doc).is_err());
    }

    #[test]
    fn point_data_inserted_before_piece_end() {
        let out = append_point_data(DOC, "span", &[Vector3::new(1.0, 0.0, -0.5)]).unwrap();
        let expected = "<PointData><DataArray Name=\"span\" NumberOfComponents=\"3\" \
             type=\"Float64\" format=\"ascii\" TRIXtype=\"SHAPE_LINEARIZATION\">\n \
             \t1.00000000000000e+00\t0.00000000000000e+00\t-5.00000000000000e-01\n \
             </DataArray></PointData></Piece>";
        assert!(out.contains(expected), "{out}");
        assert!(out.starts_with("<?xml version=\"1.0\"?>\n<VTKFile"));
        assert!(out.contains("<DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">0 1 2</DataArray>"));
        assert_eq!(read_tri_points(&out).unwrap().len(), 3);
    }

    #[test]
    fn missing_piece_rejected() {
        assert!(append_point_data("<VTKFile/>", "span", &[]).is_err());
    }

    #[test]
    fn unmatched_point_written_as_zero_row() {
        let (out, report) =
            append_sensitivities_to_tri(DOC, &[span_table()], None, &ReattachParams::default())
                .unwrap();
        assert_eq!(report.unmatched, [2]);
        let body = "\n \t0.00000000000000e+00\t2.00000000000000e+00\t0.00000000000000e+00\
                    \n \t1.00000000000000e+00\t0.00000000000000e+00\t-5.00000000000000e-01\
                    \n \t0.00000000000000e+00\t0.00000000000000e+00\t0.00000000000000e+00\n ";
        assert!(out.contains(body), "{out}");
        assert!(out.contains("Name=\"span\""));
    }

    #[test]
    fn file_helper_rewrites_in_place() {
        let dir = std::env::temp_dir().join(format!("geosens-tri-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let csvs = write_sensitivity_tables(&dir, &[span_table()]).unwrap();
        let tri = dir.join("Components.i.tri");
        fs::write(&tri, DOC).unwrap();

        let report =
            append_sensitivities_to_tri_file(&tri, &csvs, "wing_span", &ReattachParams::default())
                .unwrap();
        let rewritten = fs::read_to_string(&tri).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(report.derivatives.len(), 3);
        assert!(rewritten.contains("Name=\"wing_span\""));
        assert!(rewritten.contains("TRIXtype=\"SHAPE_LINEARIZATION\""));
    }
}
