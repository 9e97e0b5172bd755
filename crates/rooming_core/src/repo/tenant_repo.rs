//! Tenant repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Tenant names are unique; duplicates surface as `Conflict`.
//! - Tenant deletes are unguarded: assignments and payments cascade.

use crate::model::tenant::{
    NewTenant, Tenant, TenantDetail, TenantId, TenantOverview, TenantPatch,
};
use crate::model::transaction::TenantTransactionFilter;
use crate::model::EntityKind;
use crate::repo::assignment_repo::assignments_in;
use crate::repo::deletion_guard::delete_with_policy;
use crate::repo::ledger_repo::tenant_transactions_in;
use crate::repo::lookup::EntityLookup;
use crate::repo::rows::{parse_tenant, TENANT_SELECT_SQL};
use crate::repo::{map_write_error, with_read_snapshot, with_write_tx, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for tenant directory operations.
pub trait TenantRepository {
    fn create_tenant(&self, tenant: &NewTenant) -> RepoResult<Tenant>;
    fn get_tenant(&self, id: TenantId) -> RepoResult<Option<TenantDetail>>;
    fn get_tenant_by_name(&self, name: &str) -> RepoResult<Option<TenantDetail>>;
    /// Oldest tenant first; each with its assignment history.
    fn list_tenants(&self) -> RepoResult<Vec<TenantOverview>>;
    fn update_tenant(&self, id: TenantId, patch: &TenantPatch) -> RepoResult<Tenant>;
    fn delete_tenant(&self, id: TenantId) -> RepoResult<()>;
}

/// SQLite-backed tenant repository.
pub struct SqliteTenantRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTenantRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TenantRepository for SqliteTenantRepository<'_> {
    fn create_tenant(&self, tenant: &NewTenant) -> RepoResult<Tenant> {
        with_write_tx(self.conn, |tx| {
            tx.execute(
                "INSERT INTO tenants (name, notes) VALUES (?1, ?2);",
                params![tenant.name.as_str(), tenant.notes.as_deref()],
            )
            .map_err(|err| map_write_error(err, EntityKind::Tenant))?;
            let id = tx.last_insert_rowid();
            find_tenant(tx, id)?.ok_or(RepoError::NotFound {
                kind: EntityKind::Tenant,
                id,
            })
        })
    }

    fn get_tenant(&self, id: TenantId) -> RepoResult<Option<TenantDetail>> {
        with_read_snapshot(self.conn, |conn| load_detail(conn, id))
    }

    fn get_tenant_by_name(&self, name: &str) -> RepoResult<Option<TenantDetail>> {
        with_read_snapshot(self.conn, |conn| {
            match conn.id_by_name(EntityKind::Tenant, name)? {
                Some(id) => load_detail(conn, id),
                None => Ok(None),
            }
        })
    }

    fn list_tenants(&self) -> RepoResult<Vec<TenantOverview>> {
        with_read_snapshot(self.conn, |conn| {
            let mut stmt = conn.prepare(&format!("{TENANT_SELECT_SQL} ORDER BY t.id ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut tenants = Vec::new();
            while let Some(row) = rows.next()? {
                tenants.push(parse_tenant(row, "t_")?);
            }

            tenants
                .into_iter()
                .map(|tenant| {
                    let assignments = assignments_in(conn, Some(tenant.id))?;
                    Ok(TenantOverview {
                        tenant,
                        assignments,
                    })
                })
                .collect()
        })
    }

    fn update_tenant(&self, id: TenantId, patch: &TenantPatch) -> RepoResult<Tenant> {
        with_write_tx(self.conn, |tx| {
            tx.require_entity(EntityKind::Tenant, id)?;
            if let Some(name) = patch.name.as_deref() {
                tx.execute(
                    "UPDATE tenants SET name = ?2 WHERE id = ?1;",
                    params![id, name],
                )
                .map_err(|err| map_write_error(err, EntityKind::Tenant))?;
            }
            if let Some(notes) = patch.notes.as_ref() {
                tx.execute(
                    "UPDATE tenants SET notes = ?2 WHERE id = ?1;",
                    params![id, notes.as_deref()],
                )?;
            }
            find_tenant(tx, id)?.ok_or(RepoError::NotFound {
                kind: EntityKind::Tenant,
                id,
            })
        })
    }

    fn delete_tenant(&self, id: TenantId) -> RepoResult<()> {
        with_write_tx(self.conn, |tx| delete_with_policy(tx, EntityKind::Tenant, id))
    }
}

fn find_tenant(conn: &Connection, id: TenantId) -> RepoResult<Option<Tenant>> {
    let mut stmt = conn.prepare(&format!("{TENANT_SELECT_SQL} WHERE t.id = ?1;"))?;
    let tenant = stmt
        .query_row([id], |row| Ok(parse_tenant(row, "t_")))
        .optional()?
        .transpose()?;
    Ok(tenant)
}

fn load_detail(conn: &Connection, id: TenantId) -> RepoResult<Option<TenantDetail>> {
    let Some(tenant) = find_tenant(conn, id)? else {
        return Ok(None);
    };
    let assignments = assignments_in(conn, Some(id))?;
    let payments = tenant_transactions_in(
        conn,
        &TenantTransactionFilter {
            tenant_id: Some(id),
            ..TenantTransactionFilter::default()
        },
    )?;
    Ok(Some(TenantDetail {
        tenant,
        assignments,
        payments,
    }))
}
