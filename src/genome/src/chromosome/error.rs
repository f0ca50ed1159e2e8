use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ChromosomeError {
    #[error("A genome must carry at least one marker locus")]
    NoMarkers,

    #[error("A genome must carry at least one chromosome")]
    NoChromosomes,

    #[error("Cannot split {markers} marker loci across {chromosomes} chromosomes")]
    TooManyChromosomes{markers: usize, chromosomes: usize},

    #[error("Invalid recombination rate: expected a finite, non-negative number of Morgans per locus, got {0}")]
    InvalidRecombinationRate(f64),
}
