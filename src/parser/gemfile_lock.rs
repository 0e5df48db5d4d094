//! Gemfile.lock parser
//!
//! Extracts the top-level pins of every `specs:` block. Pins are indented
//! four spaces; deeper lines are the pinned gem's own requirements and are
//! skipped.
//!
//! Format example:
//! ```text
//! GEM
//!   remote: https://rubygems.org/
//!   specs:
//!     actionpack (3.2.8)
//!       activemodel (= 3.2.8)
//!     nokogiri (1.16.0-x86_64-linux)
//!
//! DEPENDENCIES
//!   rails (= 3.2.8)
//! ```

use regex::Regex;
use tracing::debug;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{LockManifest, LockedGem};

const SPEC_INDENT: usize = 4;
const SECTION_KEY_INDENT: usize = 2;

/// Parser for Bundler lock files
pub struct GemfileLockParser {
    /// Regex for section headers: `GEM`, `BUNDLED WITH`
    section_re: Regex,
    /// Regex for a pinned spec: `name (version[-platform])`
    spec_re: Regex,
}

impl GemfileLockParser {
    pub fn new() -> Self {
        Self {
            section_re: Regex::new(r"^[A-Z][A-Z ]*$").unwrap(),
            spec_re: Regex::new(r"^(\S+)\s+\(\s*([^()\s]+)\s*\)$").unwrap(),
        }
    }
}

impl Default for GemfileLockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GemfileLockParser {
    fn parse(&self, content: &str) -> Result<LockManifest, ParseError> {
        let mut manifest = LockManifest::new();
        let mut seen_section = false;
        let mut in_specs = false;

        for (index, raw_line) in content.lines().enumerate() {
            let line_num = index + 1;
            let line = raw_line.trim_end();
            let trimmed = line.trim_start();

            // Skip empty lines and comments
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indent = line.len() - trimmed.len();

            if indent == 0 {
                if !self.section_re.is_match(trimmed) && !seen_section {
                    return Err(ParseError::MissingSection { line: line_num });
                }
                seen_section = true;
                in_specs = false;
                continue;
            }

            if !seen_section {
                return Err(ParseError::MissingSection { line: line_num });
            }

            if indent == SECTION_KEY_INDENT {
                in_specs = trimmed == "specs:";
                continue;
            }

            if indent != SPEC_INDENT || !in_specs {
                continue;
            }

            let Some(caps) = self.spec_re.captures(trimmed) else {
                return Err(ParseError::InvalidEntry {
                    line: line_num,
                    content: trimmed.to_string(),
                });
            };

            let name = &caps[1];
            let (version, platform) = match caps[2].split_once('-') {
                Some((version, platform)) => (version, Some(platform.to_string())),
                None => (&caps[2], None),
            };

            let inserted = manifest.insert(
                name,
                LockedGem {
                    version: version.to_string(),
                    platform,
                    line: line_num,
                },
            );

            if !inserted {
                debug!("Ignoring duplicate pin of {} on line {}", name, line_num);
            }
        }

        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_top_level_specs() {
        let parser = GemfileLockParser::new();
        let content = r#"GEM
  remote: https://rubygems.org/
  specs:
    actionpack (3.2.8)
      activemodel (= 3.2.8)
      rack (~> 1.4.0)
    activesupport (3.2.8)
      i18n (~> 0.6)
    rack (1.4.1)

PLATFORMS
  ruby

DEPENDENCIES
  rails (= 3.2.8)
"#;
        let result = parser.parse(content).unwrap();

        let pins: Vec<(&str, &str)> = result
            .iter()
            .map(|(name, gem)| (name, gem.version.as_str()))
            .collect();
        assert_eq!(
            pins,
            vec![
                ("actionpack", "3.2.8"),
                ("activesupport", "3.2.8"),
                ("rack", "1.4.1"),
            ]
        );
    }

    #[test]
    fn parse_ignores_transitive_requirements() {
        let parser = GemfileLockParser::new();
        let content = r#"GEM
  specs:
    actionpack (3.2.8)
      activemodel (= 3.2.8)
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(result.lookup("activemodel"), None);
    }

    #[test]
    fn parse_ignores_dependencies_section() {
        let parser = GemfileLockParser::new();
        let content = r#"GEM
  specs:

DEPENDENCIES
  rails (= 3.2.8)
    odd (1.0.0)
"#;
        let result = parser.parse(content).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn parse_reads_git_and_path_sources() {
        let parser = GemfileLockParser::new();
        let content = r#"GIT
  remote: https://github.com/rails/rails.git
  revision: 0123456789abcdef
  branch: main
  specs:
    rails (7.2.0.alpha)

PATH
  remote: .
  specs:
    my_engine (0.1.0)
      rails (>= 7.0)
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(result.lookup("rails"), Some("7.2.0.alpha"));
        assert_eq!(result.lookup("my_engine"), Some("0.1.0"));
    }

    #[test]
    fn parse_keeps_first_duplicate_pin() {
        let parser = GemfileLockParser::new();
        let content = r#"GEM
  specs:
    nokogiri (1.16.0-x86_64-linux)
      racc (~> 1.4)
    nokogiri (1.15.0)
"#;
        let result = parser.parse(content).unwrap();
        let gem = result.get("nokogiri").unwrap();

        assert_eq!(gem.version, "1.16.0");
        assert_eq!(gem.platform.as_deref(), Some("x86_64-linux"));
        assert_eq!(gem.line, 3);
    }

    #[test]
    fn parse_tolerates_comments_blank_lines_and_crlf() {
        let parser = GemfileLockParser::new();
        let content = "# generated\r\n\r\nGEM\r\n  specs:\r\n    # pinned\r\n    rake  ( 0.9.2.2 )   \r\n\r\n";
        let result = parser.parse(content).unwrap();
        assert_eq!(result.lookup("rake"), Some("0.9.2.2"));
    }

    #[test]
    fn parse_returns_empty_manifest_for_empty_content() {
        let parser = GemfileLockParser::new();
        assert!(parser.parse("").unwrap().is_empty());
        assert!(parser.parse("\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_truncated_entry() {
        let parser = GemfileLockParser::new();
        let content = "GEM\n  specs:\n    rack (1.4.1)\n    activesupport (3.2";
        let result = parser.parse(content);

        assert_eq!(
            result,
            Err(ParseError::InvalidEntry {
                line: 4,
                content: "activesupport (3.2".to_string(),
            })
        );
    }

    #[test]
    fn parse_rejects_content_without_section() {
        let parser = GemfileLockParser::new();
        let result = parser.parse("<html>\n  <body>not a lock file</body>\n</html>\n");

        assert_eq!(result, Err(ParseError::MissingSection { line: 1 }));
    }

    #[test]
    fn parse_rejects_indented_content_before_section() {
        let parser = GemfileLockParser::new();
        let result = parser.parse("    rack (1.4.1)\n");

        assert_eq!(result, Err(ParseError::MissingSection { line: 1 }));
    }
}
