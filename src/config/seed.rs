//! Seed data loading from config.toml
//!
//! The session store starts from the records described here: the reference
//! composition catalog, sample clients and projects, their budgets and the
//! already-imported reference tables. When no file is present the built-in
//! sample set from [`SeedConfig::builtin`] is used.

use crate::entities::{BudgetStatus, ItemSource, ProjectStatus, TableKind};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Region stamped on imported tables unless configured otherwise
pub const DEFAULT_IMPORT_REGION: &str = "São Paulo";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Reference-table import defaults
    #[serde(default)]
    pub import: ImportConfig,
    /// Compositions offered by "add item"
    #[serde(default)]
    pub catalog: Vec<CatalogSeed>,
    /// Initial clients
    #[serde(default)]
    pub clients: Vec<ClientSeed>,
    /// Initial projects
    #[serde(default)]
    pub projects: Vec<ProjectSeed>,
    /// Initial budgets, attached to projects by name
    #[serde(default)]
    pub budgets: Vec<BudgetSeed>,
    /// Reference tables that are already "imported"
    #[serde(default)]
    pub reference_tables: Vec<ReferenceTableSeed>,
}

/// Defaults applied when importing a reference table
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Region recorded on every imported table
    #[serde(default = "default_region")]
    pub default_region: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_region: default_region(),
        }
    }
}

fn default_region() -> String {
    DEFAULT_IMPORT_REGION.to_string()
}

/// One reference composition
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSeed {
    /// Unique composition code
    pub code: String,
    /// Description
    pub description: String,
    /// Unit of measure
    pub unit: String,
    /// Reference unit price
    pub unit_price: f64,
    /// Work category
    pub category: String,
    /// Price source
    pub source: ItemSource,
}

/// One client record
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSeed {
    /// Contact name
    pub name: String,
    /// E-mail
    #[serde(default)]
    pub email: String,
    /// Phone
    #[serde(default)]
    pub phone: String,
    /// Company
    #[serde(default)]
    pub company: String,
}

/// One project record
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSeed {
    /// Project name, also used to attach budgets
    pub name: String,
    /// Client name (free text)
    pub client: String,
    /// Site address
    pub address: String,
    /// Lifecycle stage
    pub status: ProjectStatus,
    /// Contracted total
    #[serde(default)]
    pub total_budget: f64,
    /// Start date (`YYYY-MM-DD`)
    pub start_date: NaiveDate,
    /// Physical progress
    #[serde(default)]
    pub completion_percentage: i32,
}

/// One budget version with its items
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetSeed {
    /// Name of the owning project
    pub project: String,
    /// Version number
    #[serde(default = "first_version")]
    pub version: i32,
    /// BDI percentage
    pub bdi: f64,
    /// Approval state
    #[serde(default = "draft_status")]
    pub status: BudgetStatus,
    /// Line items in display order
    #[serde(default)]
    pub items: Vec<BudgetItemSeed>,
}

const fn first_version() -> i32 {
    1
}

const fn draft_status() -> BudgetStatus {
    BudgetStatus::Draft
}

/// One budget line
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetItemSeed {
    /// Composition code
    pub code: String,
    /// Description
    pub description: String,
    /// Unit of measure
    pub unit: String,
    /// Quantity
    pub quantity: f64,
    /// Unit price
    pub unit_price: f64,
    /// Line total; `quantity * unit_price` when omitted
    #[serde(default)]
    pub total_price: Option<f64>,
    /// Work category
    pub category: String,
    /// Price source
    pub source: ItemSource,
}

impl BudgetItemSeed {
    /// The stored line total
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.total_price
            .unwrap_or(self.quantity * self.unit_price)
    }
}

/// One reference table record
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceTableSeed {
    /// Display name
    pub name: String,
    /// Table family
    pub kind: TableKind,
    /// Region
    pub region: String,
    /// Reference date
    pub date: NaiveDate,
}

/// Loads seed data from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing or enums hold unknown values
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load seed data from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref)
        .inspect_err(|e| tracing::error!("Failed to read {}: {e}", path_ref.display()))?;
    parse_seed_config(&contents)
}

/// Parses seed data from TOML text
pub fn parse_seed_config(contents: &str) -> Result<SeedConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

impl SeedConfig {
    /// A configuration with no records at all
    #[must_use]
    pub fn empty() -> Self {
        Self {
            import: ImportConfig::default(),
            catalog: Vec::new(),
            clients: Vec::new(),
            projects: Vec::new(),
            budgets: Vec::new(),
            reference_tables: Vec::new(),
        }
    }

    /// The sample data shipped with the application.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn builtin() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

        let catalog = vec![
            CatalogSeed {
                code: "SINAPI-92145".to_string(),
                description: "ARMADURA DE PILAR OU VIGA DE UMA ESTRUTURA CONVENCIONAL DE CONCRETO ARMADO".to_string(),
                unit: "KG".to_string(),
                unit_price: 14.50,
                category: "ESTRUTURA".to_string(),
                source: ItemSource::Sinapi,
            },
            CatalogSeed {
                code: "SINAPI-87301".to_string(),
                description: "ARGAMASSA TRAÇO 1:3 (EM VOLUME DE CIMENTO E AREIA MÉDIA ÚMIDA)".to_string(),
                unit: "m³".to_string(),
                unit_price: 650.00,
                category: "ALVENARIA".to_string(),
                source: ItemSource::Sinapi,
            },
            CatalogSeed {
                code: "TCPO-14.202".to_string(),
                description: "PORTA DE MADEIRA PARA PINTURA, SEMI-OCA (LEVE OU MÉDIA)".to_string(),
                unit: "UN".to_string(),
                unit_price: 350.00,
                category: "ESQUADRIAS".to_string(),
                source: ItemSource::Tcpo,
            },
            CatalogSeed {
                code: "SINAPI-101908".to_string(),
                description: "PISO CERÂMICO ESMALTADO PEI-4".to_string(),
                unit: "m²".to_string(),
                unit_price: 45.90,
                category: "PISOS".to_string(),
                source: ItemSource::Sinapi,
            },
        ];

        let clients = vec![
            ClientSeed {
                name: "João Silva".to_string(),
                email: "joao@gmail.com".to_string(),
                phone: "11999999999".to_string(),
                company: "Pessoa Física".to_string(),
            },
            ClientSeed {
                name: "Tech Solutions".to_string(),
                email: "contato@tech.com".to_string(),
                phone: "1133334444".to_string(),
                company: "Tech Soluções Ltda".to_string(),
            },
        ];

        let projects = vec![
            ProjectSeed {
                name: "Residencial Alpha".to_string(),
                client: "João Silva".to_string(),
                address: "Rua das Flores, 123".to_string(),
                status: ProjectStatus::Active,
                total_budget: 450_000.0,
                start_date: date(2023, 10, 1),
                completion_percentage: 35,
            },
            ProjectSeed {
                name: "Reforma Comercial Centro".to_string(),
                client: "Tech Solutions".to_string(),
                address: "Av. Paulista, 1000".to_string(),
                status: ProjectStatus::Planning,
                total_budget: 120_000.0,
                start_date: date(2024, 2, 15),
                completion_percentage: 0,
            },
        ];

        let budgets = vec![
            BudgetSeed {
                project: "Residencial Alpha".to_string(),
                version: 1,
                bdi: 25.0,
                status: BudgetStatus::Draft,
                items: vec![
                    BudgetItemSeed {
                        code: "SINAPI-001".to_string(),
                        description: "ALVENARIA DE VEDAÇÃO DE BLOCOS CERÂMICOS".to_string(),
                        unit: "m²".to_string(),
                        quantity: 150.0,
                        unit_price: 85.50,
                        total_price: Some(12_825.0),
                        category: "PAREDES".to_string(),
                        source: ItemSource::Sinapi,
                    },
                    BudgetItemSeed {
                        code: "SINAPI-002".to_string(),
                        description: "CONTRAPISO EM ARGAMASSA TRAÇO 1:4".to_string(),
                        unit: "m²".to_string(),
                        quantity: 145.0,
                        unit_price: 42.20,
                        total_price: Some(6_119.0),
                        category: "PISOS".to_string(),
                        source: ItemSource::Sinapi,
                    },
                ],
            },
            BudgetSeed {
                project: "Reforma Comercial Centro".to_string(),
                version: 1,
                bdi: 20.0,
                status: BudgetStatus::Draft,
                items: Vec::new(),
            },
        ];

        let reference_tables = vec![ReferenceTableSeed {
            name: "SINAPI 02/2024".to_string(),
            kind: TableKind::Sinapi,
            region: DEFAULT_IMPORT_REGION.to_string(),
            date: date(2024, 2, 1),
        }];

        Self {
            import: ImportConfig::default(),
            catalog,
            clients,
            projects,
            budgets,
            reference_tables,
        }
    }
}
