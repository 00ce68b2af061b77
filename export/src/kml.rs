//! FILENAME: export/src/kml.rs
//! KML serialization for map-overlay exports.
//!
//! One `<Placemark>` per geo-tagged record: name, a CDATA description block
//! built from the caller's column list, and a `<Point>` with KML's
//! lng,lat,alt coordinate order. No schema validation; rows with missing or
//! malformed coordinates are silently skipped, matching the engine's
//! degradation policy.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use inventory_model::Record;
use crate::csv::Column;
use crate::error::ExportError;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Serializes rows to a KML document.
///
/// `lat_field`/`lng_field` name the coordinate fields; `name_field` feeds
/// the placemark name; `description_columns` render as labeled lines inside
/// the CDATA description balloon.
pub fn to_kml(
    rows: &[Record],
    lat_field: &str,
    lng_field: &str,
    name_field: &str,
    description_columns: &[Column],
) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut kml = BytesStart::new("kml");
    kml.push_attribute(("xmlns", KML_NAMESPACE));
    writer.write_event(Event::Start(kml))?;
    writer.write_event(Event::Start(BytesStart::new("Document")))?;

    for record in rows {
        let lat = record.field(lat_field).coerce_number();
        let lng = record.field(lng_field).coerce_number();
        if !lat.is_finite() || !lng.is_finite() {
            continue;
        }
        write_placemark(&mut writer, record, lat, lng, name_field, description_columns)?;
    }

    writer.write_event(Event::End(BytesEnd::new("Document")))?;
    writer.write_event(Event::End(BytesEnd::new("kml")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_placemark(
    writer: &mut Writer<Vec<u8>>,
    record: &Record,
    lat: f64,
    lng: f64,
    name_field: &str,
    description_columns: &[Column],
) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new("Placemark")))?;

    writer.write_event(Event::Start(BytesStart::new("name")))?;
    let name = record.field(name_field).display_string();
    writer.write_event(Event::Text(BytesText::new(&name)))?;
    writer.write_event(Event::End(BytesEnd::new("name")))?;

    writer.write_event(Event::Start(BytesStart::new("description")))?;
    writer.write_event(Event::CData(BytesCData::new(description_html(
        record,
        description_columns,
    ))))?;
    writer.write_event(Event::End(BytesEnd::new("description")))?;

    writer.write_event(Event::Start(BytesStart::new("Point")))?;
    writer.write_event(Event::Start(BytesStart::new("coordinates")))?;
    // KML coordinate order is longitude,latitude,altitude.
    let coordinates = format!("{},{},0", lng, lat);
    writer.write_event(Event::Text(BytesText::new(&coordinates)))?;
    writer.write_event(Event::End(BytesEnd::new("coordinates")))?;
    writer.write_event(Event::End(BytesEnd::new("Point")))?;

    writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    Ok(())
}

/// Description balloon body: one `<b>Header:</b> value` line per column,
/// blank values included so balloons keep a uniform shape across pins.
fn description_html(record: &Record, columns: &[Column]) -> String {
    columns
        .iter()
        .map(|column| {
            format!(
                "<b>{}:</b> {}",
                column.header,
                record.field(&column.field).display_string()
            )
        })
        .collect::<Vec<_>>()
        .join("<br/>")
}
