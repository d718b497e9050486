use uuid::Uuid;

use crate::database::models::Lead;

/// Columns of `leads` that queries may filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadColumn {
    Id,
    OrganizationId,
    AgentId,
}

impl LeadColumn {
    pub fn to_sql(&self) -> &'static str {
        match self {
            LeadColumn::Id => "\"id\"",
            LeadColumn::OrganizationId => "\"organization_id\"",
            LeadColumn::AgentId => "\"agent_id\"",
        }
    }

    fn value_of(&self, lead: &Lead) -> Option<Uuid> {
        match self {
            LeadColumn::Id => Some(lead.id),
            LeadColumn::OrganizationId => Some(lead.organization_id),
            LeadColumn::AgentId => lead.agent_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq(Uuid),
    Null,
    NotNull,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub column: LeadColumn,
    pub operator: FilterOp,
}

/// Equality and null filters over leads, rendered either as a parameterized
/// SQL WHERE clause or evaluated directly against a row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    conditions: Vec<WhereCondition>,
}

impl LeadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, column: LeadColumn, operator: FilterOp) -> Self {
        self.conditions.push(WhereCondition { column, operator });
        self
    }

    pub fn organization(self, organization_id: Uuid) -> Self {
        self.push(LeadColumn::OrganizationId, FilterOp::Eq(organization_id))
    }

    pub fn agent(self, agent_id: Uuid) -> Self {
        self.push(LeadColumn::AgentId, FilterOp::Eq(agent_id))
    }

    pub fn assigned(self) -> Self {
        self.push(LeadColumn::AgentId, FilterOp::NotNull)
    }

    pub fn unassigned(self) -> Self {
        self.push(LeadColumn::AgentId, FilterOp::Null)
    }

    pub fn id(self, id: Uuid) -> Self {
        self.push(LeadColumn::Id, FilterOp::Eq(id))
    }

    pub fn conditions(&self) -> &[WhereCondition] {
        &self.conditions
    }

    /// Render as `(clause, params)` with placeholders numbered from
    /// `starting_param_index + 1`.
    pub fn to_where_sql(&self, starting_param_index: usize) -> (String, Vec<Uuid>) {
        let mut params = vec![];
        let mut sql_conditions = vec![];

        for condition in &self.conditions {
            let column = condition.column.to_sql();
            match &condition.operator {
                FilterOp::Eq(value) => {
                    params.push(*value);
                    sql_conditions.push(format!("{} = ${}", column, starting_param_index + params.len()));
                }
                FilterOp::Null => sql_conditions.push(format!("{} IS NULL", column)),
                FilterOp::NotNull => sql_conditions.push(format!("{} IS NOT NULL", column)),
            }
        }

        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        (where_clause, params)
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        self.conditions.iter().all(|condition| {
            let value = condition.column.value_of(lead);
            match &condition.operator {
                FilterOp::Eq(expected) => value == Some(*expected),
                FilterOp::Null => value.is_none(),
                FilterOp::NotNull => value.is_some(),
            }
        })
    }
}
