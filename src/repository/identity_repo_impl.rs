// ==========================================
// Portal de Bolsas - Repository de identidades (SQLite)
// ==========================================
// Tabela: scholar
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::identity::ExistingIdentity;
use crate::domain::import::ImportContext;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::identity_repo::IdentityRepository;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct IdentityRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl IdentityRepositoryImpl {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Compartilha a conexão com os demais repositórios
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Cadastra uma identidade (usado por seed e testes)
    pub fn insert_identity(
        &self,
        organization_id: Option<&str>,
        identity: &ExistingIdentity,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO scholar (scholar_id, organization_id, nome, cpf, email)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                identity.id,
                organization_id,
                identity.nome,
                identity.cpf,
                identity.email,
            ],
        )?;
        Ok(())
    }

    fn query_identities(&self, organization_id: Option<&str>) -> RepositoryResult<Vec<ExistingIdentity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT scholar_id, cpf, email, nome
            FROM scholar
            WHERE (?1 IS NULL OR organization_id = ?1)
            ORDER BY created_at, scholar_id
            "#,
        )?;

        let identities = stmt
            .query_map(params![organization_id], |row| {
                Ok(ExistingIdentity {
                    id: row.get(0)?,
                    cpf: row.get(1)?,
                    email: row.get(2)?,
                    nome: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(identities)
    }
}

#[async_trait]
impl IdentityRepository for IdentityRepositoryImpl {
    async fn fetch_all_identities(
        &self,
        ctx: &ImportContext,
    ) -> RepositoryResult<Vec<ExistingIdentity>> {
        self.query_identities(ctx.organization_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn repo() -> IdentityRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        IdentityRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn identity(id: &str, cpf: &str, email: &str) -> ExistingIdentity {
        ExistingIdentity {
            id: id.to_string(),
            cpf: Some(cpf.to_string()),
            email: Some(email.to_string()),
            nome: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_filters_by_organization() {
        let repo = repo();
        repo.insert_identity(Some("org-a"), &identity("s1", "11144477735", "a@x.com"))
            .unwrap();
        repo.insert_identity(Some("org-b"), &identity("s2", "22233344405", "b@x.com"))
            .unwrap();

        let all = repo
            .fetch_all_identities(&ImportContext::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let org_a = repo
            .fetch_all_identities(&ImportContext::for_organization("org-a"))
            .await
            .unwrap();
        assert_eq!(org_a.len(), 1);
        assert_eq!(org_a[0].id, "s1");
    }

    #[test]
    fn test_duplicate_id_is_unique_violation() {
        let repo = repo();
        let ana = identity("s1", "11144477735", "a@x.com");
        repo.insert_identity(None, &ana).unwrap();

        let err = repo.insert_identity(None, &ana).unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }
}
