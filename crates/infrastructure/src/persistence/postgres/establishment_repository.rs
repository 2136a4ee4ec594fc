//! PostgreSQL Establishment Repository
//!
//! Persiste el agregado completo. La fila de establishments lleva los campos
//! propios y las cuatro tablas de puntos de contacto se reescriben enteras en
//! la misma transacción en cada save, conservando el orden de inserción en
//! sort_order.

use denda_domain::establishments::{
    ContactPerson, Establishment, EstablishmentAddress, EstablishmentFilter, EstablishmentName,
    EstablishmentPhone, EstablishmentRepository, SocialMediaLink,
};
use denda_domain::shared_kernel::{
    AddressId, ContactId, DomainError, EstablishmentId, EstablishmentStatus, PhoneId, Result,
    SocialMediaId,
};
use denda_domain::values::{Address, EmailAddress, PersonName, PhoneNumber, SocialMediaPlatform, WebUrl};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use std::collections::HashMap;
use uuid::Uuid;

/// Repositorio PostgreSQL del agregado Establishment
#[derive(Clone)]
pub struct PostgresEstablishmentRepository {
    pool: PgPool,
}

/// Puntos de contacto cargados en lote, agrupados por establecimiento
#[derive(Default)]
struct ChildRows {
    addresses: HashMap<Uuid, Vec<EstablishmentAddress>>,
    phones: HashMap<Uuid, Vec<EstablishmentPhone>>,
    social_media: HashMap<Uuid, Vec<SocialMediaLink>>,
    contacts: HashMap<Uuid, Vec<ContactPerson>>,
}

impl PostgresEstablishmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_children(&self, ids: &[Uuid]) -> Result<ChildRows> {
        let mut children = ChildRows::default();
        if ids.is_empty() {
            return Ok(children);
        }

        let rows = sqlx::query(
            r#"
            SELECT id, establishment_id, street, city, state, postal_code, country, is_primary, label
            FROM establishment_addresses
            WHERE establishment_id = ANY($1)
            ORDER BY establishment_id, sort_order
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to load establishment addresses: {}", e),
        })?;
        for row in &rows {
            let owner: Uuid = row.get("establishment_id");
            children
                .addresses
                .entry(owner)
                .or_default()
                .push(map_row_to_address(row)?);
        }

        let rows = sqlx::query(
            r#"
            SELECT id, establishment_id, country_code, number, label
            FROM establishment_phones
            WHERE establishment_id = ANY($1)
            ORDER BY establishment_id, sort_order
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to load establishment phones: {}", e),
        })?;
        for row in &rows {
            let owner: Uuid = row.get("establishment_id");
            children
                .phones
                .entry(owner)
                .or_default()
                .push(map_row_to_phone(row)?);
        }

        let rows = sqlx::query(
            r#"
            SELECT id, establishment_id, platform, url
            FROM establishment_social_media
            WHERE establishment_id = ANY($1)
            ORDER BY establishment_id, sort_order
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to load establishment social media: {}", e),
        })?;
        for row in &rows {
            let owner: Uuid = row.get("establishment_id");
            children
                .social_media
                .entry(owner)
                .or_default()
                .push(map_row_to_social_media(row)?);
        }

        let rows = sqlx::query(
            r#"
            SELECT id, establishment_id, first_name, last_name, email,
                   phone_country_code, phone_number, role
            FROM establishment_contacts
            WHERE establishment_id = ANY($1)
            ORDER BY establishment_id, sort_order
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to load establishment contacts: {}", e),
        })?;
        for row in &rows {
            let owner: Uuid = row.get("establishment_id");
            children
                .contacts
                .entry(owner)
                .or_default()
                .push(map_row_to_contact(row)?);
        }

        Ok(children)
    }

    fn assemble(row: &PgRow, children: &mut ChildRows) -> Result<Establishment> {
        let id: Uuid = row.get("id");
        map_row_to_establishment(
            row,
            children.addresses.remove(&id).unwrap_or_default(),
            children.phones.remove(&id).unwrap_or_default(),
            children.social_media.remove(&id).unwrap_or_default(),
            children.contacts.remove(&id).unwrap_or_default(),
        )
    }
}

#[async_trait::async_trait]
impl EstablishmentRepository for PostgresEstablishmentRepository {
    async fn save(&self, establishment: &Establishment) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to begin transaction: {}", e),
            })?;

        sqlx::query(
            r#"
            INSERT INTO establishments (id, name, description, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(establishment.id.0)
        .bind(establishment.name.as_str())
        .bind(&establishment.description)
        .bind(establishment.status.to_string())
        .bind(establishment.created_at)
        .bind(establishment.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to save establishment: {}", e),
        })?;

        // Reescritura completa de los puntos de contacto
        sqlx::query("DELETE FROM establishment_addresses WHERE establishment_id = $1")
            .bind(establishment.id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to clear establishment addresses: {}", e),
            })?;

        sqlx::query("DELETE FROM establishment_phones WHERE establishment_id = $1")
            .bind(establishment.id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to clear establishment phones: {}", e),
            })?;

        sqlx::query("DELETE FROM establishment_social_media WHERE establishment_id = $1")
            .bind(establishment.id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to clear establishment social media: {}", e),
            })?;

        sqlx::query("DELETE FROM establishment_contacts WHERE establishment_id = $1")
            .bind(establishment.id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to clear establishment contacts: {}", e),
            })?;

        for (position, entry) in establishment.addresses.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO establishment_addresses
                    (id, establishment_id, street, city, state, postal_code, country,
                     is_primary, label, sort_order)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(entry.id.0)
            .bind(establishment.id.0)
            .bind(entry.address.street())
            .bind(entry.address.city())
            .bind(entry.address.state())
            .bind(entry.address.postal_code())
            .bind(entry.address.country())
            .bind(entry.is_primary)
            .bind(&entry.label)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to save establishment address: {}", e),
            })?;
        }

        for (position, entry) in establishment.phones.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO establishment_phones
                    (id, establishment_id, country_code, number, label, sort_order)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(entry.id.0)
            .bind(establishment.id.0)
            .bind(entry.phone.country_code())
            .bind(entry.phone.number())
            .bind(&entry.label)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to save establishment phone: {}", e),
            })?;
        }

        for (position, entry) in establishment.social_media.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO establishment_social_media
                    (id, establishment_id, platform, url, sort_order)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(entry.id.0)
            .bind(establishment.id.0)
            .bind(entry.platform.as_str())
            .bind(entry.url.as_str())
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to save establishment social media link: {}", e),
            })?;
        }

        for (position, entry) in establishment.contacts.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO establishment_contacts
                    (id, establishment_id, first_name, last_name, email,
                     phone_country_code, phone_number, role, sort_order)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(entry.id.0)
            .bind(establishment.id.0)
            .bind(entry.name.first_name())
            .bind(entry.name.last_name())
            .bind(entry.email.as_str())
            .bind(entry.phone.as_ref().map(|p| p.country_code()))
            .bind(entry.phone.as_ref().map(|p| p.number()))
            .bind(&entry.role)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to save establishment contact: {}", e),
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to commit transaction: {}", e),
            })?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        establishment_id: &EstablishmentId,
    ) -> Result<Option<Establishment>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, status, created_at, updated_at
            FROM establishments
            WHERE id = $1
            "#,
        )
        .bind(establishment_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to find establishment by id: {}", e),
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut children = self.load_children(&[establishment_id.0]).await?;
        Ok(Some(Self::assemble(&row, &mut children)?))
    }

    async fn find_all(&self, filter: &EstablishmentFilter) -> Result<Vec<Establishment>> {
        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
            "SELECT id, name, description, status, created_at, updated_at FROM establishments",
        );
        push_filter_conditions(&mut qb, filter);
        qb.push(" ORDER BY created_at ASC LIMIT ");
        qb.push_bind(filter.limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(filter.offset as i64);

        let rows = qb.build().fetch_all(&self.pool).await.map_err(|e| {
            DomainError::InfrastructureError {
                message: format!("Failed to list establishments: {}", e),
            }
        })?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.get("id")).collect();
        let mut children = self.load_children(&ids).await?;

        let mut establishments = Vec::with_capacity(rows.len());
        for row in &rows {
            establishments.push(Self::assemble(row, &mut children)?);
        }
        Ok(establishments)
    }

    async fn count(&self, filter: &EstablishmentFilter) -> Result<usize> {
        let mut qb: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT COUNT(*) as count FROM establishments");
        push_filter_conditions(&mut qb, filter);

        let row = qb.build().fetch_one(&self.pool).await.map_err(|e| {
            DomainError::InfrastructureError {
                message: format!("Failed to count establishments: {}", e),
            }
        })?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM establishments WHERE LOWER(name) = LOWER($1)) AS present",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::InfrastructureError {
            message: format!("Failed to check establishment name: {}", e),
        })?;

        Ok(row.get("present"))
    }

    async fn delete(&self, establishment_id: &EstablishmentId) -> Result<()> {
        // Los puntos de contacto caen por ON DELETE CASCADE
        sqlx::query("DELETE FROM establishments WHERE id = $1")
            .bind(establishment_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError {
                message: format!("Failed to delete establishment: {}", e),
            })?;

        Ok(())
    }
}

fn push_filter_conditions(
    qb: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>,
    filter: &EstablishmentFilter,
) {
    let mut has_where = false;

    if let Some(status) = &filter.status {
        qb.push(" WHERE status = ");
        qb.push_bind(status.to_string());
        has_where = true;
    }

    if let Some(name_contains) = &filter.name_contains {
        qb.push(if has_where { " AND " } else { " WHERE " });
        qb.push("name ILIKE ");
        qb.push_bind(format!("%{}%", name_contains));
    }
}

fn map_row_to_establishment(
    row: &PgRow,
    addresses: Vec<EstablishmentAddress>,
    phones: Vec<EstablishmentPhone>,
    social_media: Vec<SocialMediaLink>,
    contacts: Vec<ContactPerson>,
) -> Result<Establishment> {
    let id: Uuid = row.get("id");
    let name_raw: String = row.get("name");
    let status_raw: String = row.get("status");

    let name = EstablishmentName::new(name_raw).map_err(|e| DomainError::InfrastructureError {
        message: format!("Stored establishment name is invalid: {}", e),
    })?;
    let status: EstablishmentStatus =
        status_raw
            .parse()
            .map_err(|e: String| DomainError::InfrastructureError {
                message: format!("Stored establishment status is invalid: {}", e),
            })?;

    Ok(Establishment {
        id: EstablishmentId(id),
        name,
        description: row.get("description"),
        status,
        addresses,
        phones,
        social_media,
        contacts,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_row_to_address(row: &PgRow) -> Result<EstablishmentAddress> {
    let id: Uuid = row.get("id");
    let state: Option<String> = row.get("state");
    let address = Address::new(
        row.get::<String, _>("street"),
        row.get::<String, _>("city"),
        state,
        row.get::<String, _>("postal_code"),
        row.get::<String, _>("country"),
    )
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Stored address is invalid: {}", e),
    })?;

    Ok(EstablishmentAddress {
        id: AddressId(id),
        address,
        is_primary: row.get("is_primary"),
        label: row.get("label"),
    })
}

fn map_row_to_phone(row: &PgRow) -> Result<EstablishmentPhone> {
    let id: Uuid = row.get("id");
    let phone = PhoneNumber::new(
        row.get::<String, _>("country_code"),
        row.get::<String, _>("number"),
    )
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Stored phone number is invalid: {}", e),
    })?;

    Ok(EstablishmentPhone {
        id: PhoneId(id),
        phone,
        label: row.get("label"),
    })
}

fn map_row_to_social_media(row: &PgRow) -> Result<SocialMediaLink> {
    let id: Uuid = row.get("id");
    let platform: SocialMediaPlatform = row
        .get::<String, _>("platform")
        .parse()
        .map_err(|e: DomainError| DomainError::InfrastructureError {
            message: format!("Stored social media platform is invalid: {}", e),
        })?;
    let url = WebUrl::new(row.get::<String, _>("url")).map_err(|e| {
        DomainError::InfrastructureError {
            message: format!("Stored social media url is invalid: {}", e),
        }
    })?;

    Ok(SocialMediaLink {
        id: SocialMediaId(id),
        platform,
        url,
    })
}

fn map_row_to_contact(row: &PgRow) -> Result<ContactPerson> {
    let id: Uuid = row.get("id");
    let name = PersonName::new(
        row.get::<String, _>("first_name"),
        row.get::<String, _>("last_name"),
    )
    .map_err(|e| DomainError::InfrastructureError {
        message: format!("Stored contact name is invalid: {}", e),
    })?;
    let email = EmailAddress::new(row.get::<String, _>("email")).map_err(|e| {
        DomainError::InfrastructureError {
            message: format!("Stored contact email is invalid: {}", e),
        }
    })?;

    let phone = match (
        row.get::<Option<String>, _>("phone_country_code"),
        row.get::<Option<String>, _>("phone_number"),
    ) {
        (Some(country_code), Some(number)) => {
            Some(PhoneNumber::new(country_code, number).map_err(|e| {
                DomainError::InfrastructureError {
                    message: format!("Stored contact phone is invalid: {}", e),
                }
            })?)
        }
        _ => None,
    };

    Ok(ContactPerson {
        id: ContactId(id),
        name,
        email,
        phone,
        role: row.get("role"),
    })
}
