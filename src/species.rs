//! Species filter constants: exclusion list, reference species, minimum count.

/// The species that must anchor every emitted alignment (human reference assembly).
pub const REFERENCE_SPECIES: &str = "hg38";

/// Minimum number of retained species (reference included) for a gene to be emitted.
pub const MIN_SPECIES: usize = 2;

/// Assemblies excluded from CDS analysis: non-eutherian vertebrates plus
/// lineages outside the scope of the downstream codon-model study.
pub const EXCLUDED_SPECIES: &[&str] = &[
    "tupChi1",
    "speTri2",
    "jacJac1",
    "micOch1",
    "criGri1",
    "mesAur1",
    "rn6",
    "hetGla2",
    "cavPor3",
    "chiLan1",
    "octDeg1",
    "oryCun2",
    "ochPri3",
    "susScr3",
    "vicPac2",
    "camFer1",
    "turTru2",
    "orcOrc1",
    "panHod1",
    "bosTau8",
    "oviAri3",
    "capHir1",
    "felCat8",
    "musFur1",
    "ailMel1",
    "odoRosDiv1",
    "lepWed1",
    "pteAle1",
    "pteVam1",
    "eptFus1",
    "myoDav1",
    "myoLuc2",
    "conCri1",
    "loxAfr3",
    "eleEdw1",
    "triMan1",
    "chrAsi1",
    "echTel2",
    "oryAfe1",
    "dasNov3",
    "monDom5",
    "sarHar1",
    "ornAna1",
    "colLiv1",
    "falChe1",
    "falPer1",
    "ficAlb2",
    "zonAlb1",
    "geoFor1",
    "pseHum1",
    "melUnd1",
    "amaVit1",
    "araMac1",
    "anaPla1",
    "galGal4",
    "melGal1",
    "allMis1",
    "cheMyd1",
    "chrPic2",
    "anoCar2",
    "tetNig2",
    "gasAcu1",
    "gadMor1",
    "lepOcu1",
    "cerSim1",
    "macEug2",
    "equCab2",
    "eriEur2",
    "sorAra2",
    "oreNil2",
    "oryLat2",
    "taeGut2",
    "latCha1",
    "apaSpi1",
    "pelSin1",
    "fr3",
    "neoBri1",
    "hapBur1",
    "mayZeb1",
    "punNye1",
    "danRer10",
    "astMex1",
    "xenTro7",
    "xipMac1",
    "takFla1",
    "petMar2",
];

/// Returns true if the assembly is on the exclusion list.
#[must_use]
pub fn is_excluded(assembly: &str) -> bool {
    EXCLUDED_SPECIES.contains(&assembly)
}
