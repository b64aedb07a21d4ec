//! vCard 3.0 serialization.
//!
//! [`serialize`] is total: every [`ContactRecord`], including an empty one,
//! produces a framed card with an `N` line. Other properties appear only
//! when their source field has content.
//!
//! ```text
//! BEGIN:VCARD
//! VERSION:3.0
//! FN:Jane Doe
//! N:Doe;Jane;;;
//! ORG:Acme Corp
//! EMAIL;TYPE=INTERNET,PREF:jane@acme.example
//! TEL;TYPE=WORK,VOICE:+1 555 0100
//! ADR;TYPE=WORK:;;1 Main St;Springfield;IL;62701;USA
//! END:VCARD
//! ```
//!
//! Values are copied verbatim, without RFC 2426 escaping: a `,`, `;` or
//! newline inside a value goes out as is, so a multi-line note spans
//! several physical lines. Lines are joined with `\n` and the card has no
//! trailing newline.

use crate::naming::vcard_filename;
use crate::types::{ContactField, ContactRecord};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// MIME type of the produced payload.
pub const VCARD_MIME: &str = "text/vcard";

/// Display name: the full name, or first + last name trimmed.
pub fn display_name(contact: &ContactRecord) -> String {
    match contact.get(ContactField::FullName) {
        Some(full) => full.to_string(),
        None => format!(
            "{} {}",
            contact.get_or_empty(ContactField::FirstName),
            contact.get_or_empty(ContactField::LastName)
        )
        .trim()
        .to_string(),
    }
}

/// Serialize a contact as vCard 3.0 text.
pub fn serialize(contact: &ContactRecord) -> String {
    let field = |f| contact.get_or_empty(f);
    let mut lines: Vec<String> = vec!["BEGIN:VCARD".into(), "VERSION:3.0".into()];

    let name = display_name(contact);
    if !name.is_empty() {
        lines.push(format!("FN:{name}"));
    }
    lines.push(format!(
        "N:{};{};;;",
        field(ContactField::LastName),
        field(ContactField::FirstName)
    ));

    let simple = [
        ("ORG", ContactField::Organization),
        ("TITLE", ContactField::JobTitle),
        ("EMAIL;TYPE=INTERNET,PREF", ContactField::Email),
        ("TEL;TYPE=WORK,VOICE", ContactField::Phone),
        ("TEL;TYPE=CELL,VOICE", ContactField::Mobile),
        ("URL", ContactField::Website),
    ];
    for (key, f) in simple {
        if let Some(value) = contact.get(f) {
            lines.push(format!("{key}:{value}"));
        }
    }

    if contact.get(ContactField::Address).is_some() || contact.get(ContactField::City).is_some() {
        lines.push(format!(
            "ADR;TYPE=WORK:;;{};{};{};{};{}",
            field(ContactField::Address),
            field(ContactField::City),
            field(ContactField::State),
            field(ContactField::ZipCode),
            field(ContactField::Country)
        ));
    }

    if let Some(notes) = contact.get(ContactField::Notes) {
        lines.push(format!("NOTE:{notes}"));
    }

    lines.push("END:VCARD".into());
    lines.join("\n")
}

/// A serialized card ready for the save/download collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VCardExport {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

impl VCardExport {
    pub fn from_contact(contact: &ContactRecord) -> Self {
        Self {
            filename: vcard_filename(contact.get(ContactField::FullName)),
            mime: VCARD_MIME,
            content: serialize(contact),
        }
    }

    /// Write the card into `dir` under its suggested filename.
    ///
    /// Fails with `InvalidInput` when `filename` is not a single plain file
    /// name, so nothing is ever written outside `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let mut components = Path::new(&self.filename).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unsafe vCard filename '{}'", self.filename),
            ));
        }
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_contact;
    use tempfile::TempDir;

    fn contact(fields: &[(ContactField, &str)]) -> ContactRecord {
        let mut c = ContactRecord::default();
        for (f, v) in fields {
            c.set(*f, *v);
        }
        c
    }

    fn count_lines(card: &str, prefix: &str) -> usize {
        card.lines().filter(|l| l.starts_with(prefix)).count()
    }

    #[test]
    fn empty_contact_has_frame_and_n_only() {
        let card = serialize(&ContactRecord::default());
        assert_eq!(card, "BEGIN:VCARD\nVERSION:3.0\nN:;;;;\nEND:VCARD");
    }

    #[test]
    fn full_contact_emits_every_property_in_order() {
        let card = serialize(&sample_contact());
        let expected = [
            "BEGIN:VCARD",
            "VERSION:3.0",
            "FN:Jane Doe",
            "N:Doe;Jane;;;",
            "ORG:Acme Corp",
            "TITLE:Chief Widget Officer",
            "EMAIL;TYPE=INTERNET,PREF:jane@acme.example",
            "TEL;TYPE=WORK,VOICE:+1 555 0100",
            "TEL;TYPE=CELL,VOICE:+1 555 0199",
            "URL:https://acme.example",
            "ADR;TYPE=WORK:;;1 Main St;Springfield;IL;62701;USA",
            "NOTE:Met at the expo",
            "END:VCARD",
        ]
        .join("\n");
        assert_eq!(card, expected);
    }

    #[test]
    fn full_name_and_email_only() {
        let card = serialize(&contact(&[
            (ContactField::FullName, "Jane Doe"),
            (ContactField::Email, "jane@x.com"),
        ]));
        assert!(card.lines().any(|l| l == "FN:Jane Doe"));
        assert!(card.lines().any(|l| l == "N:;;;;"));
        assert!(card.lines().any(|l| l == "EMAIL;TYPE=INTERNET,PREF:jane@x.com"));
        for absent in ["ORG", "TITLE", "TEL", "URL", "ADR", "NOTE"] {
            assert_eq!(count_lines(&card, absent), 0, "{absent} should be omitted");
        }
    }

    #[test]
    fn fn_falls_back_to_first_and_last_name() {
        let card = serialize(&contact(&[
            (ContactField::FirstName, "Jane"),
            (ContactField::LastName, "Doe"),
        ]));
        assert!(card.lines().any(|l| l == "FN:Jane Doe"));
        assert!(card.lines().any(|l| l == "N:Doe;Jane;;;"));
    }

    #[test]
    fn fn_fallback_trims_missing_half() {
        let card = serialize(&contact(&[(ContactField::LastName, "Doe")]));
        assert!(card.lines().any(|l| l == "FN:Doe"));
    }

    #[test]
    fn address_emitted_with_partial_components() {
        let card = serialize(&contact(&[
            (ContactField::Address, "1 Main St"),
            (ContactField::City, "Springfield"),
        ]));
        assert!(card.lines().any(|l| l == "ADR;TYPE=WORK:;;1 Main St;Springfield;;;"));
    }

    #[test]
    fn city_alone_triggers_address() {
        let card = serialize(&contact(&[(ContactField::City, "Springfield")]));
        assert!(card.lines().any(|l| l == "ADR;TYPE=WORK:;;;Springfield;;;"));
    }

    #[test]
    fn country_alone_does_not_trigger_address() {
        let card = serialize(&contact(&[
            (ContactField::Country, "USA"),
            (ContactField::ZipCode, "62701"),
        ]));
        assert_eq!(count_lines(&card, "ADR"), 0);
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let card = serialize(&contact(&[
            (ContactField::Organization, ""),
            (ContactField::FullName, ""),
        ]));
        assert_eq!(count_lines(&card, "ORG"), 0);
        assert_eq!(count_lines(&card, "FN"), 0);
    }

    #[test]
    fn frame_and_n_appear_exactly_once() {
        for c in [ContactRecord::default(), sample_contact()] {
            let card = serialize(&c);
            assert_eq!(count_lines(&card, "BEGIN:VCARD"), 1);
            assert_eq!(count_lines(&card, "END:VCARD"), 1);
            assert_eq!(count_lines(&card, "N:"), 1);
            assert!(!card.ends_with('\n'));
            assert!(!card.contains("\n\n"));
        }
    }

    #[test]
    fn serialization_is_deterministic() {
        let c = sample_contact();
        assert_eq!(serialize(&c), serialize(&c));
    }

    #[test]
    fn export_uses_sanitized_filename_and_mime() {
        let export = VCardExport::from_contact(&contact(&[(ContactField::FullName, "Jane  Q Doe")]));
        assert_eq!(export.filename, "Jane_Q_Doe.vcf");
        assert_eq!(export.mime, "text/vcard");
        assert!(export.content.starts_with("BEGIN:VCARD"));
    }

    #[test]
    fn export_without_name_uses_default_filename() {
        let export = VCardExport::from_contact(&ContactRecord::default());
        assert_eq!(export.filename, "contact.vcf");
    }

    #[test]
    fn write_to_saves_file() {
        let tmp = TempDir::new().unwrap();
        let export = VCardExport::from_contact(&sample_contact());
        let path = export.write_to(&tmp.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "Jane_Doe.vcf");
        assert_eq!(fs::read_to_string(path).unwrap(), export.content);
    }

    #[test]
    fn write_to_keeps_unsafe_names_inside_dir() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        for (name, expected) in [
            ("Jane Doe / Acme", "Jane_Doe_Acme.vcf"),
            ("../escaped", "_escaped.vcf"),
        ] {
            let export = VCardExport::from_contact(&contact(&[(ContactField::FullName, name)]));
            let path = export.write_to(&out).unwrap();
            assert_eq!(path, out.join(expected));
            assert!(path.is_file());
        }
        assert!(!tmp.path().join("escaped.vcf").exists());
    }

    #[test]
    fn write_to_rejects_filename_with_directories() {
        let tmp = TempDir::new().unwrap();
        for filename in ["../x.vcf", "a/b.vcf", ""] {
            let export = VCardExport {
                filename: filename.to_string(),
                mime: VCARD_MIME,
                content: String::new(),
            };
            let err = export.write_to(tmp.path()).unwrap_err();
            assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput, "{filename}");
        }
    }

    #[test]
    fn values_are_copied_verbatim() {
        let card = serialize(&contact(&[
            (ContactField::Organization, "Acme, Inc; R&D"),
            (ContactField::Notes, "line one\nline two"),
        ]));
        assert!(card.contains("\nORG:Acme, Inc; R&D\n"));
        assert!(card.contains("\nNOTE:line one\nline two\nEND:VCARD"));
    }
}
