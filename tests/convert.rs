//! End-to-end conversion tests: build a real template package and a real
//! report workbook, run the conversion, and inspect the written file.

use rust_xlsxwriter::Workbook;
use sdtfill::data::{self, ConsultantDirectory};
use sdtfill::docx::{content_control, DocumentTree, Package};
use sdtfill::report;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const WORDML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn tagged_control(tag: &str, text: &str) -> String {
    format!(
        r#"<w:sdt><w:sdtPr><w:id w:val="1"/><w:tag w:val="{tag}"/></w:sdtPr><w:sdtContent><w:r><w:rPr><w:b/></w:rPr><w:t>{text}</w:t></w:r></w:sdtContent></w:sdt>"#
    )
}

fn measures_block(n: u32) -> String {
    format!(
        r#"<w:sdt><w:sdtPr><w:tag w:val="Anzahl_Maßnahmen_{n}"/></w:sdtPr><w:sdtContent><w:p><w:r><w:t>Maßnahmenpaket {n}</w:t></w:r></w:p></w:sdtContent></w:sdt>"#
    )
}

fn template_document() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="{ns}"><w:body>"#,
            "<w:p><w:r><w:t>Sanierungsfahrplan</w:t></w:r></w:p>",
            "<w:p>{kunde}</w:p>",
            "<w:p>{adresse}</w:p>",
            "{m1}{m2}{m3}",
            "<w:p>{offen}</w:p>",
            "</w:body></w:document>"
        ),
        ns = WORDML_NS,
        kunde = tagged_control("Kunde_Name", "Platzhalter"),
        adresse = tagged_control("Gebäude_Adresse", "Platzhalter"),
        m1 = measures_block(1),
        m2 = measures_block(2),
        m3 = measures_block(3),
        offen = tagged_control("Offener_Wert", "Platzhalter"),
    )
}

fn write_template(path: &Path) {
    let mut data = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut data));
        let options =
            FileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#,
        )
        .unwrap();
        zip.start_file("word/styles.xml", options).unwrap();
        zip.write_all(b"<w:styles/>").unwrap();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(template_document().as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    std::fs::write(path, data).unwrap();
}

fn write_report_workbook(path: &Path, rows: &[(&str, &str)]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Export NWG").unwrap();
    worksheet.write_string(0, 0, "Tags").unwrap();
    worksheet.write_string(0, 1, "Werte").unwrap();
    for (i, (tag, value)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, *tag).unwrap();
        worksheet.write_string(row, 1, *value).unwrap();
    }
    workbook.save(path).unwrap();
}

fn control_text(tree: &DocumentTree, tag: &str) -> String {
    let control = content_control::collect(tree)
        .into_iter()
        .find(|c| c.tag() == Some(tag))
        .unwrap_or_else(|| panic!("control '{tag}' not found"));
    tree.text_content(control.node())
}

#[test]
fn test_full_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.docx");
    let workbook = dir.path().join("report.xlsx");
    let output = dir.path().join("out.docx");

    write_template(&template);
    write_report_workbook(
        &workbook,
        &[
            ("Kunde_Name", "Muster GmbH"),
            ("Gebäude_Adresse", "Hauptstr. 5"),
            ("Anzahl_Maßnahmen", "2"),
        ],
    );

    let values = data::load_values_from_path(&workbook, None).unwrap();
    let outcome = report::fill_report(&template, &values, &output).unwrap();

    // The open placeholder had no workbook row.
    assert_eq!(outcome.missing.clone().into_vec(), vec!["Offener_Wert"]);
    let pruned = outcome.pruned.unwrap();
    assert_eq!((pruned.deleted, pruned.unwrapped), (2, 1));

    let result = Package::open(&output).unwrap();
    let tree = DocumentTree::parse(result.document_xml().unwrap()).unwrap();
    let xml = tree.to_xml();

    // Substitution into the first run, conditional block 2 kept as plain
    // text, blocks 1 and 3 gone.
    assert_eq!(control_text(&tree, "Kunde_Name"), "Muster GmbH");
    assert_eq!(control_text(&tree, "Gebäude_Adresse"), "Hauptstr. 5");
    assert!(xml.contains("Maßnahmenpaket 2"));
    assert!(!xml.contains("Maßnahmenpaket 1"));
    assert!(!xml.contains("Maßnahmenpaket 3"));
    assert!(!xml.contains("Anzahl_Maßnahmen_2"));

    // Fixed text and the run formatting survive.
    assert!(xml.contains("<w:t>Sanierungsfahrplan</w:t>"));
    assert!(xml.contains("<w:b/>"));

    // Every other part is byte-identical.
    let original = Package::open(&template).unwrap();
    assert_eq!(
        result.part("word/styles.xml").unwrap(),
        original.part("word/styles.xml").unwrap()
    );
    assert_eq!(
        result.part("[Content_Types].xml").unwrap(),
        original.part("[Content_Types].xml").unwrap()
    );
}

#[test]
fn test_conversion_without_control_value_keeps_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.docx");
    let workbook = dir.path().join("report.xlsx");
    let output = dir.path().join("out.docx");

    write_template(&template);
    write_report_workbook(&workbook, &[("Kunde_Name", "Muster GmbH")]);

    let values = data::load_values_from_path(&workbook, None).unwrap();
    let outcome = report::fill_report(&template, &values, &output).unwrap();

    assert!(outcome.pruned.is_none());
    // The conditional blocks were treated as ordinary, unmapped tags.
    assert!(outcome.missing.contains("Anzahl_Maßnahmen_1"));
    assert!(outcome.missing.contains("Anzahl_Maßnahmen_3"));

    let result = Package::open(&output).unwrap();
    let tree = DocumentTree::parse(result.document_xml().unwrap()).unwrap();
    assert!(tree.to_xml().contains("Anzahl_Maßnahmen_2"));
}

#[test]
fn test_consultant_record_feeds_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.docx");
    let directory_path = dir.path().join("berater.xlsx");
    let output = dir.path().join("out.docx");

    // Template with a consultant placeholder only.
    let doc = format!(
        r#"<w:document xmlns:w="{WORDML_NS}"><w:body><w:p>{}</w:p></w:body></w:document>"#,
        tagged_control("Berater_Name", "Platzhalter")
    );
    let mut data_bytes = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut data_bytes));
        let options = FileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(doc.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    std::fs::write(&template, data_bytes).unwrap();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Berater_Name").unwrap();
    worksheet.write_string(0, 1, "Berater_Beraternummer").unwrap();
    worksheet.write_string(1, 0, "Maxi Muster").unwrap();
    worksheet.write_string(1, 1, "12345").unwrap();
    workbook.save(&directory_path).unwrap();

    let directory = ConsultantDirectory::from_path(&directory_path).unwrap();
    let mut values = sdtfill::ValueMap::new();
    directory.select("Maxi Muster").unwrap().apply(&mut values);

    let outcome = report::fill_report(&template, &values, &output).unwrap();
    assert!(outcome.missing.is_empty());

    let result = Package::open(&output).unwrap();
    let tree = DocumentTree::parse(result.document_xml().unwrap()).unwrap();
    assert_eq!(control_text(&tree, "Berater_Name"), "Maxi Muster");
}

#[test]
fn test_failed_conversion_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("missing.docx");
    let output = dir.path().join("out.docx");

    let result = report::fill_report(&template, &sdtfill::ValueMap::new(), &output);

    assert!(result.is_err());
    assert!(!output.exists());
}
