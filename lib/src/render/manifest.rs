use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::site::SiteDescription;

/// A `package.json` for the exported project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    pub private: bool,
    pub version: String,
    #[serde(rename = "type")]
    pub module_type: String,
    pub scripts: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

const SCRIPTS: &[(&str, &str)] = &[
    ("dev", "vite"),
    ("build", "tsc && vite build"),
    ("preview", "vite preview"),
];

const DEPENDENCIES: &[(&str, &str)] = &[
    ("react", "^18.3.1"),
    ("react-dom", "^18.3.1"),
    ("framer-motion", "^11.3.0"),
];

const DEV_DEPENDENCIES: &[(&str, &str)] = &[
    ("@types/react", "^18.3.3"),
    ("@types/react-dom", "^18.3.0"),
    ("@vitejs/plugin-react", "^4.3.1"),
    ("autoprefixer", "^10.4.20"),
    ("postcss", "^8.4.47"),
    ("tailwindcss", "^3.4.11"),
    ("typescript", "^5.5.3"),
    ("vite", "^5.4.1"),
];

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Manifest {
    /// The manifest for `site`'s project. Only the package name varies.
    pub fn for_site(site: &SiteDescription) -> Self {
        Manifest {
            name: site.slug().to_string(),
            private: true,
            version: "0.1.0".into(),
            module_type: "module".into(),
            scripts: table(SCRIPTS),
            dependencies: table(DEPENDENCIES),
            dev_dependencies: table(DEV_DEPENDENCIES),
        }
    }
}
