// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loading STEP files from disk.

use std::io::{self, Write};
use std::path::PathBuf;

use step_pmi_core::Error as CoreError;
use step_pmi_engine::{LoadError, ReaderConfig, StepReader};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn temp_step(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".stp")
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_sample_header() {
    init_tracing();
    let mut reader = StepReader::new(fixture("sample.step"));
    let doc = reader.load().unwrap();
    let header = doc.header();

    assert_eq!(doc.iso_version(), "ISO-10303-21");
    assert_eq!(
        header.file_description.description,
        vec!["PMI test part".to_string(), "部品".to_string()]
    );
    let level = &header.file_description.implementation_level;
    assert_eq!(level.file_edition, Some(2));
    assert_eq!(level.minimum_edition, Some(1));

    assert_eq!(header.file_name.name, "bracket.stp");
    assert_eq!(header.file_name.author, vec!["J. Müller".to_string()]);
    assert_eq!(header.file_name.originating_system, "CAD 1.0");
    assert_eq!(
        header.file_schema.schemas,
        vec!["AP242_MANAGED_MODEL_BASED_3D_ENGINEERING_MIM_LF { 1 0 10303 442 1 1 4 }".to_string()]
    );
    assert!(header.unknown_entries.is_empty());
}

#[test]
fn test_load_sample_entities() {
    let mut reader = StepReader::new(fixture("sample.step"));
    let doc = reader.load().unwrap();

    assert!(doc.entity_text(61).unwrap().starts_with("(GEOMETRIC_TOLERANCE("));
    assert!(doc.entity_text(1).unwrap().contains("CARTESIAN_POINT"));
    assert_eq!(doc.entity_text(2000), None);
    assert!(doc.anchors().is_empty());
    assert!(doc.references().is_empty());
}

#[test]
fn test_load_edition_three_sections() {
    let mut reader = StepReader::new(fixture("full_sample.step"));
    let doc = reader.load().unwrap();
    let header = doc.header();

    assert_eq!(header.file_schema.schemas.len(), 2);
    let population = header.file_population.as_ref().unwrap();
    assert_eq!(population.determination_method, "include_all_compatible");
    assert_eq!(population.governed_sections, vec!["DATA".to_string()]);

    let language = header.section_language.as_ref().unwrap();
    assert_eq!(language.section, None);
    assert_eq!(language.language, "English");

    let context = header.section_context.as_ref().unwrap();
    assert_eq!(context.section.as_deref(), Some("DATA"));
    assert_eq!(context.context, vec!["mechanical".to_string(), "pmi".to_string()]);
    assert_eq!(header.unknown_entries, vec!["VENDOR_SPECIFIC('x')".to_string()]);

    assert_eq!(doc.anchors(), ["<bolt_hole>=#10", "<frame>=#11"]);
    assert_eq!(doc.reference_text(501), Some("<part.stp#13>"));
    assert_eq!(doc.signatures(), ["c2lnbmF0dXJl"]);
    assert_eq!(doc.unknown_sections()[0].name, "EXTRA_SECTION");

    // both DATA sections
    assert_eq!(doc.data().len(), 3);
    assert_eq!(doc.pmi().semantic.datums.datums[0].label, Some('C'));
}

#[test]
fn test_summary() {
    let path = fixture("full_sample.step");
    let mut reader = StepReader::new(&path);

    let before = reader.summary();
    assert!(!before.is_loaded);
    assert_eq!(before.iso_version, None);
    assert_eq!(before.data_count, 0);
    assert_eq!(before.file_path, Some(path.display().to_string()));

    reader.load().unwrap();
    let after = reader.summary();
    assert!(after.is_loaded);
    assert_eq!(after.iso_version.as_deref(), Some("ISO-10303-21"));
    assert_eq!(after.header_count, 7);
    assert_eq!(after.anchor_count, 2);
    assert_eq!(after.reference_count, 2);
    assert_eq!(after.data_count, 3);
    assert_eq!(after.signature_count, 1);
    assert_eq!(after.unknown_section_count, 1);
    assert_eq!(after.file_path, before.file_path);
}

#[test]
fn test_load_twice_is_identical() {
    let mut reader = StepReader::new(fixture("sample.step"));
    let first = reader.load().unwrap().clone();
    let second = reader.load().unwrap();
    assert_eq!(&first, second);
    assert!(reader.raw_content().unwrap().starts_with("ISO-10303-21;"));
}

#[test]
fn test_missing_marker_populates_nothing() {
    let file = temp_step(b"HEADER; ENDSEC; DATA; #1=FOO('x'); ENDSEC;");
    let mut reader = StepReader::new(file.path());

    let err = reader.load().unwrap_err();
    assert!(matches!(err, LoadError::Core(CoreError::MissingIsoMarker)));
    assert!(!reader.is_loaded());
    assert!(reader.document().is_none());
    assert!(reader.raw_content().is_none());
}

#[test]
fn test_failed_reload_discards_previous_document() {
    let mut file = temp_step(b"ISO-10303-21; DATA; #1=FOO(); ENDSEC;");
    let mut reader = StepReader::new(file.path());
    reader.load().unwrap();
    assert!(reader.is_loaded());

    file.as_file_mut().set_len(0).unwrap();
    assert!(reader.load().is_err());
    assert!(!reader.is_loaded());
}

#[test]
fn test_missing_file() {
    let mut reader = StepReader::new(fixture("does_not_exist.step"));
    match reader.load() {
        Err(LoadError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_latin1_fallback() {
    let file = temp_step(b"ISO-10303-21; DATA; #1=PRODUCT('Stra\xdfe','',$); ENDSEC;");

    let mut reader = StepReader::new(file.path());
    let doc = reader.load().unwrap();
    assert!(doc.entity_text(1).unwrap().contains("Straße"));

    let config = ReaderConfig {
        latin1_fallback: false,
        ..ReaderConfig::default()
    };
    let mut strict = StepReader::with_config(file.path(), config);
    match strict.load() {
        Err(LoadError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
        other => panic!("expected InvalidData, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_file_too_large() {
    let file = temp_step(b"ISO-10303-21; DATA; #1=FOO(); ENDSEC;");
    let config = ReaderConfig {
        max_file_size_mb: 0,
        ..ReaderConfig::default()
    };
    let mut reader = StepReader::with_config(file.path(), config);
    match reader.load() {
        Err(LoadError::FileTooLarge { size, max }) => {
            assert_eq!(max, 0);
            assert!(size > 0);
        }
        other => panic!("expected FileTooLarge, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_empty_file_has_no_marker() {
    let file = temp_step(b"");
    let mut reader = StepReader::new(file.path());
    assert!(matches!(
        reader.load(),
        Err(LoadError::Core(CoreError::MissingIsoMarker))
    ));
}
