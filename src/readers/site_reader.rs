use crate::error::Result;
use crate::models::SiteMetadata;
use crate::utils::encoding::decode_text;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use validator::Validate;

/// Reads the site location reference file.
///
/// The file is comma delimited with a header row. Only `SITE CODE`, `TOWN`,
/// `REGION`, `LATITUDE` and `LONGITUDE` are read; other columns (`SITE NAME`,
/// `OBJECTID`, `NOTES`) are skipped.
pub struct SiteReader {
    delimiter: u8,
}

impl SiteReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read site metadata. Rows that cannot be deserialised (for example a
    /// non-numeric latitude) or that fail validation are skipped with a warning.
    pub fn read_sites(&self, path: &Path) -> Result<Vec<SiteMetadata>> {
        let bytes = std::fs::read(path)?;
        let text = decode_text(&bytes);
        let sites = self.parse_sites(&text)?;
        info!("Loaded {} sites from {}", sites.len(), path.display());
        Ok(sites)
    }

    fn parse_sites(&self, text: &str) -> Result<Vec<SiteMetadata>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut sites = Vec::new();
        for (line, record) in reader.deserialize::<SiteMetadata>().enumerate() {
            // header is line 1
            let line = line + 2;
            let site = match record {
                Ok(site) => site,
                Err(e) => {
                    warn!("Skipping unreadable site on line {}: {}", line, e);
                    continue;
                }
            };
            match site.validate() {
                Ok(()) => sites.push(site),
                Err(e) => warn!("Skipping site on line {}: {}", line, e),
            }
        }
        Ok(sites)
    }

    /// Site metadata keyed by site code.
    pub fn read_sites_map(&self, path: &Path) -> Result<HashMap<String, SiteMetadata>> {
        let sites = self.read_sites(path)?;
        let mut map = HashMap::with_capacity(sites.len());

        for site in sites {
            if map.contains_key(&site.code) {
                warn!("Duplicate site code {}; keeping the first entry", site.code);
                continue;
            }
            map.insert(site.code.clone(), site);
        }

        Ok(map)
    }
}

impl Default for SiteReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "SITE CODE,SITE NAME,TOWN,REGION,LATITUDE,LONGITUDE,OBJECTID,NOTES";

    #[test]
    fn test_parse_sites_skips_unread_columns() {
        let text = format!(
            "{}\nCBHW, Harpswell Sound , Harpswell, Casco Bay, 43.78, -69.95, 17, resampled 2009\n",
            HEADER
        );

        let sites = SiteReader::new().parse_sites(&text).unwrap();

        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].code, "CBHW");
        assert_eq!(sites[0].town.as_deref(), Some("Harpswell"));
        assert_eq!(sites[0].region.as_deref(), Some("Casco Bay"));
        assert_eq!(sites[0].latitude, Some(43.78));
    }

    #[test]
    fn test_invalid_sites_are_skipped() {
        let text = format!(
            "{}\nCBHW,,Harpswell,Casco Bay,43.78,-69.95,1,\nBAD,,Nowhere,,95.0,-69.0,2,\n,,Blank,,,,3,\n",
            HEADER
        );

        let sites = SiteReader::new().parse_sites(&text).unwrap();

        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].code, "CBHW");
    }

    #[test]
    fn test_malformed_coordinates_are_skipped() {
        let text = format!(
            "{}\nCBHW,,Harpswell,Casco Bay,n/a,-69.95,1,\nPRV,,Portland,Casco Bay,43.65,-70.25,2,\n",
            HEADER
        );

        let sites = SiteReader::new().parse_sites(&text).unwrap();

        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].code, "PRV");
    }

    #[test]
    fn test_semicolon_delimited_sites() {
        let text = "SITE CODE;TOWN;REGION;LATITUDE;LONGITUDE\nMSPH;Phippsburg;Midcoast;43.82;-69.81\n";

        let sites = SiteReader::with_delimiter(b';').parse_sites(text).unwrap();

        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].town.as_deref(), Some("Phippsburg"));
        assert_eq!(sites[0].longitude, Some(-69.81));
    }

    #[test]
    fn test_missing_coordinates_are_allowed() {
        let text = format!("{}\nMSPH,,Phippsburg,Midcoast,,,4,\n", HEADER);

        let sites = SiteReader::new().parse_sites(&text).unwrap();

        assert_eq!(sites.len(), 1);
        assert!(!sites[0].has_location());
    }

    #[test]
    fn test_read_sites_map() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(temp_file, "CBHW,,Harpswell,Casco Bay,43.78,-69.95,1,")?;
        writeln!(temp_file, "CBHW,,Duplicate,Casco Bay,43.70,-69.90,2,")?;
        writeln!(temp_file, "PRV,,Portland,Casco Bay,43.65,-70.25,3,")?;

        let sites = SiteReader::new().read_sites_map(temp_file.path())?;

        assert_eq!(sites.len(), 2);
        assert_eq!(sites["CBHW"].town.as_deref(), Some("Harpswell"));

        Ok(())
    }
}
