/// Package implementation for Word documents.
use crate::docx::error::{DocxError, Result};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Part name of the main document inside a .docx package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Part name of the content types index every OPC package must carry.
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// A Word (.docx) package.
///
/// This is the entry point for working with report templates. It reads the
/// whole ZIP archive into memory, exposes the main document part for the
/// resolution engine, and writes a new archive with every other part copied
/// byte-identical.
///
/// # Examples
///
/// ```rust,no_run
/// use sdtfill::docx::Package;
///
/// let pkg = Package::open("template.docx")?;
/// let xml = pkg.document_xml()?;
/// println!("document part is {} bytes", xml.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Package {
    /// All parts as (name, bytes), in archive order
    parts: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Open a .docx package from a file path.
    ///
    /// The file is read completely before this returns; the package does not
    /// keep a handle on it, so the same path may later be used as the output.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_reader(Cursor::new(data))
    }

    /// Open a .docx package from a reader.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use sdtfill::docx::Package;
    /// use std::io::Cursor;
    ///
    /// let data = std::fs::read("template.docx")?;
    /// let pkg = Package::from_reader(Cursor::new(data))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| DocxError::Zip(e.to_string()))?;

        let mut parts = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| DocxError::Zip(e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push((file.name().to_string(), data));
        }

        let pkg = Self { parts };

        // Verify this is an OPC package with a Word main document part.
        if pkg.part(CONTENT_TYPES_PART).is_none() {
            return Err(DocxError::InvalidFormat(format!(
                "not an OPC package: missing {}",
                CONTENT_TYPES_PART
            )));
        }
        if pkg.part(DOCUMENT_PART).is_none() {
            return Err(DocxError::PartNotFound(DOCUMENT_PART.to_string()));
        }

        Ok(pkg)
    }

    /// Get the bytes of a part by name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(part_name, _)| part_name == name)
            .map(|(_, data)| data.as_slice())
    }

    /// List all part names in archive order.
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Get the main document part (`word/document.xml`).
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.part(DOCUMENT_PART)
            .ok_or_else(|| DocxError::PartNotFound(DOCUMENT_PART.to_string()))
    }

    /// Replace the main document part with new XML bytes.
    pub fn set_document_xml(&mut self, xml: Vec<u8>) {
        for (name, data) in &mut self.parts {
            if name == DOCUMENT_PART {
                *data = xml;
                return;
            }
        }
        self.parts.push((DOCUMENT_PART.to_string(), xml));
    }

    /// Serialize the package to .docx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut out));
            let options =
                FileOptions::default().compression_method(CompressionMethod::Deflated);

            for (name, data) in &self.parts {
                zip.start_file(name.as_str(), options)
                    .map_err(|e| DocxError::Zip(e.to_string()))?;
                zip.write_all(data)?;
            }
            zip.finish().map_err(|e| DocxError::Zip(e.to_string()))?;
        }
        Ok(out)
    }

    /// Write the package to a file.
    ///
    /// The archive is fully assembled in memory, written to a temporary file
    /// next to the destination and moved into place, so the destination
    /// either contains the complete document or is left untouched.
    pub fn save_as<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.persist(path).map_err(|e| DocxError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DOCUMENT: &[u8] =
        b"<w:document><w:body><w:p/></w:body></w:document>";

    fn sample_package_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut data));
            let options =
                FileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(CONTENT_TYPES_PART, options).unwrap();
            zip.write_all(b"<Types/>").unwrap();
            zip.start_file("word/styles.xml", options).unwrap();
            zip.write_all(b"<w:styles/>").unwrap();
            zip.start_file(DOCUMENT_PART, options).unwrap();
            zip.write_all(SAMPLE_DOCUMENT).unwrap();
            zip.finish().unwrap();
        }
        data
    }

    #[test]
    fn test_open_from_reader() {
        let pkg = Package::from_reader(Cursor::new(sample_package_bytes())).unwrap();
        assert_eq!(pkg.document_xml().unwrap(), SAMPLE_DOCUMENT);
        assert_eq!(
            pkg.part_names(),
            vec![CONTENT_TYPES_PART, "word/styles.xml", DOCUMENT_PART]
        );
    }

    #[test]
    fn test_missing_document_part_is_rejected() {
        let mut data = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut data));
            let options = FileOptions::default();
            zip.start_file(CONTENT_TYPES_PART, options).unwrap();
            zip.write_all(b"<Types/>").unwrap();
            zip.finish().unwrap();
        }

        match Package::from_reader(Cursor::new(data)) {
            Err(DocxError::PartNotFound(part)) => assert_eq!(part, DOCUMENT_PART),
            other => panic!("expected PartNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_non_zip_input_is_rejected() {
        let result = Package::from_reader(Cursor::new(b"not a zip".to_vec()));
        assert!(matches!(result, Err(DocxError::Zip(_))));
    }

    #[test]
    fn test_replace_document_keeps_other_parts_identical() {
        let mut pkg =
            Package::from_reader(Cursor::new(sample_package_bytes())).unwrap();
        pkg.set_document_xml(b"<w:document><w:body/></w:document>".to_vec());

        let reopened =
            Package::from_reader(Cursor::new(pkg.to_bytes().unwrap())).unwrap();
        assert_eq!(
            reopened.document_xml().unwrap(),
            b"<w:document><w:body/></w:document>"
        );
        assert_eq!(reopened.part("word/styles.xml").unwrap(), b"<w:styles/>");
        assert_eq!(reopened.part(CONTENT_TYPES_PART).unwrap(), b"<Types/>");
    }

    #[test]
    fn test_save_as_writes_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");

        let pkg = Package::from_reader(Cursor::new(sample_package_bytes())).unwrap();
        pkg.save_as(&path).unwrap();

        let reopened = Package::open(&path).unwrap();
        assert_eq!(reopened.document_xml().unwrap(), SAMPLE_DOCUMENT);
    }
}
