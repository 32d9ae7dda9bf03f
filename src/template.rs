//! Placeholder interpolation and the built-in Homebrewery fragments
//!
//! The fragments below are what the Homebrewery renderer expects to see for a
//! styled title page. They are reproduced exactly; only the placeholders are
//! ever substituted.

/// Replaced with the campaign title
pub const CAMPAIGN_TITLE: &str = "{{CAMPAIGN_TITLE}}";

/// Replaced with the concept header
pub const CONCEPT_HEADER: &str = "{{CONCEPT_HEADER}}";

/// Replaced with the digit of a numbered line
pub const NUMBER: &str = "{{NUMBER}}";

pub const PAGE_HEADER: &str = "{{margin-top:225px}}

{{wide,text-align:center
# {{CAMPAIGN_TITLE}}
}}

{{margin-top:25px}}

{{wide,text-align:center
##### {{CONCEPT_HEADER}}
}}

";

pub const TITLE_PAGE_STYLE: &str = "<style>
  .page#p1 {
    text-align:center;
  }
  .page#p1:after {
    display:none;
  }
  .page#p1 h1 {
    font-size:45px;
    line-height:1em;
    color:#58180D;
  }
  .page#p1 h5 {
    font-family:'ScalySansSmallCapsRemake';
    font-size:20px;
  }
</style>

";

pub const BACKGROUND_IMAGE: &str = "![background image](/assets/parchmentBackground.jpg){position:absolute,top:0px,left:0px,width:100%,height:100%,mix-blend-mode:multiply}

";

pub const STAIN_IMAGE: &str =
    "{{watercolor8,top:20px,left:-150px,width:600px,background-color:#BBAD82,opacity:30%}}

";

pub const PAGE_BREAK: &str = "\\page

";

pub const PAGE_NUMBER: &str = "{{pageNumber,auto}}

";

pub const FOOTNOTE: &str = "{{footnote {{CAMPAIGN_TITLE}}}}

";

pub const CONCEPT_NOTE: &str = "{{note
##### Concept
{{CONCEPT_HEADER}}
}}

";

pub const TOC_HEADING: &str = "{{toc,wide
# {{CAMPAIGN_TITLE}}
";

pub const TOC_CLOSE: &str = "
}}

";

pub const CAMPAIGN_HEADING: &str = "## Campaign\n";

pub const BACKGROUND_HEADING: &str = ":\n###  Background\n";

pub const BODY_NUMBER_PREFIX: &str = "### {{NUMBER}}. ";
pub const BODY_NUMBER_SUFFIX: &str = "\n";

pub const TOC_NUMBER_PREFIX: &str = "  - {{ {{NUMBER}}. ";
pub const TOC_NUMBER_SUFFIX: &str = " }}";

pub const CONCEPT_PLACEHOLDER: &str = "A New Adventure";

/// Substitutes placeholders in `template` with their values in one pass
///
/// Each entry of `values` is a `(placeholder, value)` pair. Values are
/// inserted verbatim and never scanned again, so a value that happens to
/// contain a placeholder is left as is. Braces that do not start a known
/// placeholder are copied through unchanged.
pub fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                // Only step over one brace so "{{{NUMBER}}" still matches
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_known_placeholders() {
        let out = interpolate(PAGE_HEADER, &[(CAMPAIGN_TITLE, "Crown"), (CONCEPT_HEADER, "Intro")]);
        assert!(out.contains("# Crown\n"));
        assert!(out.contains("##### Intro\n"));
        assert!(out.starts_with("{{margin-top:225px}}"));
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = interpolate(
            "{{CAMPAIGN_TITLE}} / {{CONCEPT_HEADER}}",
            &[(CAMPAIGN_TITLE, "{{CONCEPT_HEADER}}"), (CONCEPT_HEADER, "x")],
        );
        assert_eq!(out, "{{CONCEPT_HEADER}} / x");
    }

    #[test]
    fn homebrewery_braces_survive() {
        assert_eq!(interpolate(TOC_NUMBER_PREFIX, &[(NUMBER, "3")]), "  - {{ 3. ");
        assert_eq!(interpolate(FOOTNOTE, &[(CAMPAIGN_TITLE, "T")]), "{{footnote T}}\n\n");
        assert_eq!(interpolate("{{{NUMBER}}}", &[(NUMBER, "7")]), "{7}");
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        assert_eq!(interpolate("{{OTHER}}", &[(NUMBER, "1")]), "{{OTHER}}");
        assert_eq!(interpolate("trailing {", &[]), "trailing {");
    }
}
