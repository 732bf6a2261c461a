use std::fmt;

/// Offset between a placeholder token and the row it names.
///
/// Template authors write placeholders against the spreadsheet's display
/// numbering, where the header occupies line 1 and the first data row is
/// line 2. Token value `k` therefore denotes table row `k - 2`, and row
/// `i`'s own token is `i + 2`. This is a convention of the source tables,
/// not something derivable from the data; keep it as a named constant.
pub const ROW_TOKEN_OFFSET: i64 = 2;

/// Field types the remote app definition distinguishes.
///
/// Only the types that carry extra attributes (options, formulas, file
/// constraints) need their own variant; anything else is passed through
/// to the API untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    TextInput,
    Dropdown,
    SingleSelector,
    MultiSelector,
    CalculationsAndLogic,
    FileUpload,
    Other(String),
}

impl FieldType {
    pub fn from_wire(name: &str) -> Self {
        match name {
            "textInput" => FieldType::TextInput,
            "dropdown" => FieldType::Dropdown,
            "singleSelector" => FieldType::SingleSelector,
            "multiSelector" => FieldType::MultiSelector,
            "calculationsAndLogic" => FieldType::CalculationsAndLogic,
            "fileUpload" => FieldType::FileUpload,
            other => FieldType::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            FieldType::TextInput => "textInput",
            FieldType::Dropdown => "dropdown",
            FieldType::SingleSelector => "singleSelector",
            FieldType::MultiSelector => "multiSelector",
            FieldType::CalculationsAndLogic => "calculationsAndLogic",
            FieldType::FileUpload => "fileUpload",
            FieldType::Other(name) => name,
        }
    }

    /// Selector-style types submit an options list.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldType::Dropdown | FieldType::SingleSelector | FieldType::MultiSelector
        )
    }

    /// Calculation fields are the only ones that submit a formula.
    pub fn is_calculation(&self) -> bool {
        matches!(self, FieldType::CalculationsAndLogic)
    }

    pub fn is_file_upload(&self) -> bool {
        matches!(self, FieldType::FileUpload)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// One field definition from the input table.
///
/// `index` is the row's 0-based position in the template and never
/// changes; it is the identity other rows reference through placeholders.
/// `section_index` and `field_index` are the 1-based placement the
/// materializer consumes. Only the formula/display-condition text and
/// `field_name` mutate after load.
#[derive(Debug, Clone)]
pub struct FieldRow {
    pub index: usize,
    pub section_index: u32,
    pub field_index: u32,
    pub field_type: FieldType,
    pub label: String,
    pub options: Vec<String>,
    pub formula: Option<String>,
    pub display_condition: Option<String>,
    pub allowed_file_types: Vec<String>,
    pub required: bool,
    /// Remote identifier, set exactly once after successful creation.
    pub field_name: Option<String>,
}

impl FieldRow {
    /// The positional token other rows use to reference this row.
    pub fn placeholder_token(&self) -> String {
        format!("{{{}}}", self.index as i64 + ROW_TOKEN_OFFSET)
    }
}

/// All rows of one template, in original table order.
///
/// Rows are loaded once, fully, before any processing begins; nothing is
/// ever appended, deleted, or re-ordered afterwards.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    pub rows: Vec<FieldRow>,
}

impl FieldTable {
    #[must_use]
    pub fn new(rows: Vec<FieldRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Identities and credential for one run.
///
/// Threaded explicitly into the backend at construction rather than held
/// as ambient state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub app_id: String,
    pub workplace_id: String,
    pub api_key: String,
    pub requesting_user: String,
    pub endpoint: String,
}
