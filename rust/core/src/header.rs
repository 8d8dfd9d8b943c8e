// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HEADER section model
//!
//! Builds a [`StepHeader`] from the HEADER section's statements. The three
//! mandatory entities are always present (default-constructed when the file
//! omits them); the edition 3 entities are optional.

use std::fmt;

use crate::parser::{parse_argument_list, parse_entity, parse_string, parse_string_list};

/// `implementation_level` of FILE_DESCRIPTION, e.g. `'2;1'`.
///
/// `'2;1'` means written in edition 2, readable by an edition 1 reader. A
/// bare `'3'` sets both editions. Anything else leaves both absent; the raw
/// text is always kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImplementationLevel {
    pub raw: String,
    pub file_edition: Option<u32>,
    pub minimum_edition: Option<u32>,
}

fn parse_edition(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    lexical_core::parse::<u32>(text.as_bytes()).ok()
}

impl ImplementationLevel {
    pub fn parse(level: &str) -> Self {
        let trimmed = level.trim();
        let editions = match trimmed.split_once(';') {
            Some((file, minimum)) => parse_edition(file).zip(parse_edition(minimum)),
            None => parse_edition(trimmed).map(|edition| (edition, edition)),
        };

        Self {
            raw: level.to_string(),
            file_edition: editions.map(|(file, _)| file),
            minimum_edition: editions.map(|(_, minimum)| minimum),
        }
    }
}

impl fmt::Display for ImplementationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.file_edition, self.minimum_edition) {
            (Some(file), Some(minimum)) => write!(f, "Edition {} (min: {})", file, minimum),
            _ => f.write_str(&self.raw),
        }
    }
}

/// FILE_DESCRIPTION(description, implementation_level)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileDescription {
    pub description: Vec<String>,
    pub implementation_level: ImplementationLevel,
}

/// FILE_NAME(name, time_stamp, author, organization, preprocessor_version,
/// originating_system, authorisation)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileName {
    pub name: String,
    pub time_stamp: String,
    pub author: Vec<String>,
    pub organization: Vec<String>,
    pub preprocessor_version: String,
    pub originating_system: String,
    pub authorisation: String,
}

/// FILE_SCHEMA((schema_name, ...))
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileSchema {
    pub schemas: Vec<String>,
}

/// FILE_POPULATION(governing_schema, determination_method, governed_sections)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilePopulation {
    pub governing_schema: String,
    pub determination_method: String,
    pub governed_sections: Vec<String>,
}

/// SECTION_LANGUAGE([section,] language)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectionLanguage {
    /// Data section the language applies to; `None` for the default
    pub section: Option<String>,
    pub language: String,
}

/// SECTION_CONTEXT([section,] context_identifiers)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectionContext {
    pub section: Option<String>,
    pub context: Vec<String>,
}

/// The whole HEADER section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StepHeader {
    pub file_description: FileDescription,
    pub file_name: FileName,
    pub file_schema: FileSchema,
    pub file_population: Option<FilePopulation>,
    pub section_language: Option<SectionLanguage>,
    pub section_context: Option<SectionContext>,
    /// Statements that are not one of the entities above, verbatim
    pub unknown_entries: Vec<String>,
}

/// Build the header model from HEADER statements.
///
/// A repeated entity overwrites the earlier one. Statements that do not
/// parse as `NAME(args)` end up in `unknown_entries`.
pub fn build_header<'a>(statements: impl IntoIterator<Item = &'a str>) -> StepHeader {
    let mut header = StepHeader::default();

    for statement in statements {
        let (name, args) = parse_entity(statement);
        match name.as_str() {
            "FILE_DESCRIPTION" => header.file_description = file_description(args),
            "FILE_NAME" => header.file_name = file_name(args),
            "FILE_SCHEMA" => {
                header.file_schema = FileSchema {
                    schemas: parse_string_list(args),
                }
            }
            "FILE_POPULATION" => header.file_population = Some(file_population(args)),
            "SECTION_LANGUAGE" => header.section_language = Some(section_language(args)),
            "SECTION_CONTEXT" => header.section_context = Some(section_context(args)),
            _ => header.unknown_entries.push(statement.to_string()),
        }
    }

    header
}

fn string_arg(args: &[&str], index: usize) -> String {
    args.get(index).map(|arg| parse_string(arg)).unwrap_or_default()
}

fn string_list_arg(args: &[&str], index: usize) -> Vec<String> {
    args.get(index)
        .map(|arg| parse_string_list(arg))
        .unwrap_or_default()
}

fn file_description(args: &str) -> FileDescription {
    let args = parse_argument_list(args);
    FileDescription {
        description: string_list_arg(&args, 0),
        implementation_level: ImplementationLevel::parse(&string_arg(&args, 1)),
    }
}

fn file_name(args: &str) -> FileName {
    let args = parse_argument_list(args);
    FileName {
        name: string_arg(&args, 0),
        time_stamp: string_arg(&args, 1),
        author: string_list_arg(&args, 2),
        organization: string_list_arg(&args, 3),
        preprocessor_version: string_arg(&args, 4),
        originating_system: string_arg(&args, 5),
        authorisation: string_arg(&args, 6),
    }
}

fn file_population(args: &str) -> FilePopulation {
    let args = parse_argument_list(args);
    FilePopulation {
        governing_schema: string_arg(&args, 0),
        determination_method: string_arg(&args, 1),
        governed_sections: string_list_arg(&args, 2),
    }
}

fn section_language(args: &str) -> SectionLanguage {
    let args = parse_argument_list(args);
    match args.as_slice() {
        [section, language, ..] => SectionLanguage {
            section: Some(parse_string(section)),
            language: parse_string(language),
        },
        [language] => SectionLanguage {
            section: None,
            language: parse_string(language),
        },
        [] => SectionLanguage::default(),
    }
}

fn section_context(args: &str) -> SectionContext {
    let args = parse_argument_list(args);
    match args.as_slice() {
        [section, context, ..] => SectionContext {
            section: Some(parse_string(section)),
            context: parse_string_list(context),
        },
        [context] => SectionContext {
            section: None,
            context: parse_string_list(context),
        },
        [] => SectionContext::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implementation_level() {
        let level = ImplementationLevel::parse("2;1");
        assert_eq!(level.file_edition, Some(2));
        assert_eq!(level.minimum_edition, Some(1));
        assert_eq!(level.to_string(), "Edition 2 (min: 1)");

        let level = ImplementationLevel::parse("3");
        assert_eq!((level.file_edition, level.minimum_edition), (Some(3), Some(3)));
    }

    #[test]
    fn test_implementation_level_invalid() {
        for raw in ["", "abc", "2;", "2;1;0", "-1", "2.1"] {
            let level = ImplementationLevel::parse(raw);
            assert_eq!(level.file_edition, None, "{raw}");
            assert_eq!(level.minimum_edition, None, "{raw}");
            assert_eq!(level.raw, raw);
        }
        assert_eq!(ImplementationLevel::parse("xyz").to_string(), "xyz");
    }

    #[test]
    fn test_build_header() {
        let statements = [
            "FILE_DESCRIPTION(('STEP AP242'),'2;1')",
            "FILE_NAME('sample.step','2026-02-14T10:00:00',('Author'),('Company'),'pre','sys','')",
            "FILE_SCHEMA(('AUTOMOTIVE_DESIGN'))",
        ];
        let header = build_header(statements);

        assert_eq!(header.file_description.description, vec!["STEP AP242"]);
        assert_eq!(header.file_description.implementation_level.file_edition, Some(2));
        assert_eq!(header.file_name.name, "sample.step");
        assert_eq!(header.file_name.time_stamp, "2026-02-14T10:00:00");
        assert_eq!(header.file_name.author, vec!["Author"]);
        assert_eq!(header.file_name.organization, vec!["Company"]);
        assert_eq!(header.file_name.originating_system, "sys");
        assert_eq!(header.file_schema.schemas, vec!["AUTOMOTIVE_DESIGN"]);
        assert!(header.file_population.is_none());
        assert!(header.unknown_entries.is_empty());
    }

    #[test]
    fn test_missing_trailing_arguments_default_to_empty() {
        let header = build_header(["FILE_NAME('only-name')"]);
        assert_eq!(header.file_name.name, "only-name");
        assert!(header.file_name.time_stamp.is_empty());
        assert!(header.file_name.author.is_empty());
        assert!(header.file_name.authorisation.is_empty());
    }

    #[test]
    fn test_edition_three_entities() {
        let header = build_header([
            "FILE_POPULATION('AP242','$',('DATA1','DATA2'))",
            "SECTION_LANGUAGE('DATA1','ENGLISH')",
            "SECTION_CONTEXT(('CTX'))",
        ]);

        let population = header.file_population.unwrap();
        assert_eq!(population.governing_schema, "AP242");
        assert_eq!(population.governed_sections, vec!["DATA1", "DATA2"]);

        let language = header.section_language.unwrap();
        assert_eq!(language.section.as_deref(), Some("DATA1"));
        assert_eq!(language.language, "ENGLISH");

        let context = header.section_context.unwrap();
        assert_eq!(context.section, None);
        assert_eq!(context.context, vec!["CTX"]);
    }

    #[test]
    fn test_unknown_and_repeated_entries() {
        let header = build_header([
            "FILE_SCHEMA(('A'))",
            "CUSTOM_ENTRY('x')",
            "not an entity",
            "FILE_SCHEMA(('B'))",
        ]);
        assert_eq!(header.file_schema.schemas, vec!["B"]);
        assert_eq!(header.unknown_entries, vec!["CUSTOM_ENTRY('x')", "not an entity"]);
    }

    #[test]
    fn test_decoded_header_strings() {
        let header = build_header(["FILE_NAME('\\X2\\90E854C1\\X0\\.stp','',('O''Brien'),(),'','','')"]);
        assert_eq!(header.file_name.name, "部品.stp");
        assert_eq!(header.file_name.author, vec!["O'Brien"]);
        assert!(header.file_name.organization.is_empty());
    }
}
