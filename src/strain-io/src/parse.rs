use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

/// Infer a gene symbol from the name of a per-gene genotype file, e.g. `snp_Tyr.csv` -> `Tyr`
#[must_use]
pub fn gene_name_from_path(path: &Path) -> Option<String> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"snp[_-]([A-Za-z0-9]+)").expect("Failed to parse regex.");
    }
    let filename = path.file_name()?.to_string_lossy();
    RE.captures(&filename)
        .and_then(|captures| captures.get(1))
        .map(|gene| gene.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gene_names() {
        assert_eq!(gene_name_from_path(Path::new("data/snp_Tyr.csv")).as_deref(), Some("Tyr"));
        assert_eq!(gene_name_from_path(Path::new("snp-Myo5a_genotypes.csv")).as_deref(), Some("Myo5a"));
        assert_eq!(gene_name_from_path(Path::new("data/snp_dir/genotypes.csv")), None);
        assert_eq!(gene_name_from_path(Path::new("genotypes.csv")), None);
    }
}
