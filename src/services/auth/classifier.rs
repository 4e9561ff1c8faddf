//! Public / protected path classification.

/// Whether a request path bypasses the token gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    Protected,
}

/// Allow-list of path prefixes exempt from the gate.
///
/// Matching is a case-sensitive `starts_with`. Empty prefixes are discarded
/// since they would match every path.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    public_prefixes: Vec<String>,
}

impl PathClassifier {
    pub fn new<I, S>(public_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classifier = Self {
            public_prefixes: Vec::new(),
        };
        for prefix in public_prefixes {
            classifier.push(prefix.into());
        }
        classifier
    }

    /// Add endpoints the gate itself depends on (validate, refresh, logout).
    ///
    /// These must never be gated: validation traffic routed back through the
    /// gate would be re-validated forever.
    pub fn with_gate_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for endpoint in endpoints {
            self.push(endpoint.into());
        }
        self
    }

    fn push(&mut self, prefix: String) {
        if prefix.is_empty() || self.public_prefixes.contains(&prefix) {
            return;
        }
        self.public_prefixes.push(prefix);
    }

    pub fn classify(&self, path: &str) -> PathClass {
        if self
            .public_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            PathClass::Public
        } else {
            PathClass::Protected
        }
    }

    pub fn public_prefixes(&self) -> &[String] {
        &self.public_prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PathClassifier {
        PathClassifier::new(["/login", "/_next", "/about"])
            .with_gate_endpoints(["/v1/api/auth/validate", "/v1/api/auth/refresh"])
    }

    #[test]
    fn allow_listed_prefixes_are_public() {
        let c = classifier();
        assert_eq!(c.classify("/login"), PathClass::Public);
        assert_eq!(c.classify("/login?next=1"), PathClass::Public);
        assert_eq!(c.classify("/_next/static/chunk.js"), PathClass::Public);
        assert_eq!(c.classify("/about/team"), PathClass::Public);
    }

    #[test]
    fn gate_endpoints_are_self_excluded() {
        assert_eq!(
            classifier().classify("/v1/api/auth/validate"),
            PathClass::Public
        );
        assert_eq!(
            classifier().classify("/v1/api/auth/refresh"),
            PathClass::Public
        );
    }

    #[test]
    fn everything_else_is_protected() {
        let c = classifier();
        assert_eq!(c.classify("/admin/dashboard"), PathClass::Protected);
        assert_eq!(c.classify("/"), PathClass::Protected);
        assert_eq!(c.classify("/v1/api/projects"), PathClass::Protected);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(classifier().classify("/LOGIN"), PathClass::Protected);
    }

    #[test]
    fn empty_and_duplicate_prefixes_are_dropped() {
        let c = PathClassifier::new(["", "/login", "/login"]);
        assert_eq!(c.public_prefixes(), &["/login".to_string()]);
        assert_eq!(c.classify("/admin"), PathClass::Protected);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        for path in ["/admin", "/login", "/v1/api/auth/validate", ""] {
            assert_eq!(c.classify(path), c.classify(path));
        }
    }
}
