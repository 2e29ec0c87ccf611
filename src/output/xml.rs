// Tue Jan 13 2026 - Alex

use super::RegistryDocument;
use crate::orchestration::aggregator::Registry;
use crate::unit::UnitMetadata;
use itertools::Itertools;

const INDENT: &str = "  ";

/// Renders a registry as XML. Records and input names are sorted so that an
/// unchanged suite always produces the same bytes.
pub struct XmlSerializer {
    include_declaration: bool,
    root_element: String,
    record_element: String,
}

impl XmlSerializer {
    pub fn new() -> Self {
        Self {
            include_declaration: true,
            root_element: "TestCases".to_string(),
            record_element: "TestCase".to_string(),
        }
    }

    pub fn with_declaration(mut self, include: bool) -> Self {
        self.include_declaration = include;
        self
    }

    pub fn with_root_element(mut self, name: &str) -> Self {
        self.root_element = name.to_string();
        self
    }

    pub fn with_record_element(mut self, name: &str) -> Self {
        self.record_element = name.to_string();
        self
    }

    /// `None` for an empty registry; no empty document is ever produced.
    pub fn serialize(&self, registry: &Registry) -> Option<RegistryDocument> {
        if registry.is_empty() {
            return None;
        }

        let mut xml = String::new();

        if self.include_declaration {
            xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        }
        xml.push_str(&format!("<{}>\n", self.root_element));

        for unit in registry.iter().sorted_by(|a, b| a.id.cmp(&b.id)) {
            self.write_record(&mut xml, unit);
        }

        xml.push_str(&format!("</{}>\n", self.root_element));

        Some(RegistryDocument::new(xml, registry.len()))
    }

    fn write_record(&self, xml: &mut String, unit: &UnitMetadata) {
        let one = INDENT;
        let two = INDENT.repeat(2);
        let three = INDENT.repeat(3);

        xml.push_str(&format!("{}<{} id=\"{}\">\n", one, self.record_element, escape_xml(&unit.id)));
        xml.push_str(&format!("{}<Name>{}</Name>\n", two, escape_xml(&unit.display_name)));
        xml.push_str(&format!("{}<Product>{}</Product>\n", two, escape_xml(&unit.product)));
        xml.push_str(&format!("{}<Feature>{}</Feature>\n", two, escape_xml(&unit.feature)));
        xml.push_str(&format!("{}<ApplicableOS>{}</ApplicableOS>\n", two, escape_xml(&unit.applicable_os)));

        // Names only. Declared defaults stay out of the registry.
        let names = unit.input_names();
        if names.is_empty() {
            xml.push_str(&format!("{}<Inputs/>\n", two));
        } else {
            xml.push_str(&format!("{}<Inputs>\n", two));
            for name in names {
                xml.push_str(&format!("{}<Input name=\"{}\"/>\n", three, escape_xml(name)));
            }
            xml.push_str(&format!("{}</Inputs>\n", two));
        }

        xml.push_str(&format!("{}</{}>\n", one, self.record_element));
    }
}

impl Default for XmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Control characters other than tab, newline and carriage return are not
/// allowed in XML 1.0 and are replaced with U+FFFD.
pub fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c < '\u{20}' || c == '\u{fffe}' || c == '\u{ffff}' => {
                escaped.push(char::REPLACEMENT_CHARACTER)
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::InputSpec;
    use serde_json::json;
    use std::collections::HashMap;

    fn unit(id: &str, inputs: &[(&str, InputSpec)]) -> UnitMetadata {
        UnitMetadata {
            id: id.to_string(),
            display_name: format!("case {}", id),
            inputs: inputs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect::<HashMap<_, _>>(),
            product: "P".to_string(),
            feature: "F".to_string(),
            applicable_os: "WINDOWS".to_string(),
            visible: true,
        }
    }

    #[test]
    fn test_empty_registry_has_no_document() {
        assert!(XmlSerializer::new().serialize(&Registry::new()).is_none());
    }

    #[test]
    fn test_single_record() {
        let mut registry = Registry::new();
        registry.insert(unit("A", &[("x", InputSpec::untyped())]));

        let doc = XmlSerializer::new().serialize(&registry).unwrap();
        let expected = [
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
            "<TestCases>",
            "  <TestCase id=\"A\">",
            "    <Name>case A</Name>",
            "    <Product>P</Product>",
            "    <Feature>F</Feature>",
            "    <ApplicableOS>WINDOWS</ApplicableOS>",
            "    <Inputs>",
            "      <Input name=\"x\"/>",
            "    </Inputs>",
            "  </TestCase>",
            "</TestCases>",
            "",
        ]
        .join("\n");
        assert_eq!(doc.as_str(), expected);
        assert_eq!(doc.unit_count(), 1);
    }

    #[test]
    fn test_input_values_never_serialized() {
        let mut registry = Registry::new();
        registry.insert(unit(
            "A",
            &[("Password", InputSpec::typed("string").with_default(json!("hunter2")))],
        ));

        let doc = XmlSerializer::new().serialize(&registry).unwrap();
        assert!(doc.as_str().contains("<Input name=\"Password\"/>"));
        assert!(!doc.as_str().contains("hunter2"));
        assert!(!doc.as_str().contains("string"));
    }

    #[test]
    fn test_records_sorted_and_stable() {
        let mut registry = Registry::new();
        registry.insert(unit("B", &[("z", InputSpec::untyped()), ("a", InputSpec::untyped())]));
        registry.insert(unit("A", &[]));

        let serializer = XmlSerializer::new();
        let first = serializer.serialize(&registry).unwrap();
        let second = serializer.serialize(&registry.clone()).unwrap();
        assert_eq!(first, second);

        let text = first.as_str();
        assert!(text.find("id=\"A\"").unwrap() < text.find("id=\"B\"").unwrap());
        assert!(text.find("name=\"a\"").unwrap() < text.find("name=\"z\"").unwrap());
        assert!(text.contains("<Inputs/>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c\"'"), "a&lt;b&gt;&amp;&quot;c&quot;&apos;");

        let mut registry = Registry::new();
        let mut odd = unit("A&B", &[]);
        odd.display_name = "<script>".to_string();
        registry.insert(odd);

        let doc = XmlSerializer::new().serialize(&registry).unwrap();
        assert!(doc.as_str().contains("id=\"A&amp;B\""));
        assert!(doc.as_str().contains("<Name>&lt;script&gt;</Name>"));
    }

    #[test]
    fn test_control_characters_replaced() {
        assert_eq!(escape_xml("a\tb\nc\rd"), "a\tb\nc\rd");
        assert_eq!(escape_xml("bad\u{1}name\u{1b}[0m"), "bad\u{fffd}name\u{fffd}[0m");

        let mut registry = Registry::new();
        let mut odd = unit("A", &[("in\u{0}put", InputSpec::untyped())]);
        odd.display_name = "bad\u{1}name\u{1b}[0m".to_string();
        odd.applicable_os = "\u{7}".to_string();
        registry.insert(odd);

        let doc = XmlSerializer::new().serialize(&registry).unwrap();
        assert!(doc
            .as_str()
            .chars()
            .all(|c| c >= '\u{20}' || matches!(c, '\t' | '\n' | '\r')));
        assert!(doc.as_str().contains("<Name>bad\u{fffd}name\u{fffd}[0m</Name>"));
    }

    #[test]
    fn test_custom_elements() {
        let mut registry = Registry::new();
        registry.insert(unit("A", &[]));

        let doc = XmlSerializer::new()
            .with_declaration(false)
            .with_root_element("Units")
            .with_record_element("Unit")
            .serialize(&registry)
            .unwrap();
        assert!(doc.as_str().starts_with("<Units>\n  <Unit id=\"A\">"));
    }
}
