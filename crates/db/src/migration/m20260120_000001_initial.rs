//! Initial database migration.
//!
//! Creates the engine-owned tables (report descriptors, audit log,
//! per-kind configuration), the source collections the engine reads, and
//! the reference tables they point at, then seeds the per-kind defaults.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: REFERENCE TABLES
        // ============================================================
        db.execute_unprepared(SERVICES_SQL).await?;
        db.execute_unprepared(NATURES_ECONOMIQUES_SQL).await?;
        db.execute_unprepared(BANQUES_SQL).await?;

        // ============================================================
        // PART 2: SOURCE COLLECTIONS (read-only to the engine)
        // ============================================================
        db.execute_unprepared(DEMANDES_PAIEMENT_SQL).await?;
        db.execute_unprepared(RECETTES_SQL).await?;
        db.execute_unprepared(DEPENSES_SQL).await?;
        db.execute_unprepared(PAIEMENTS_SQL).await?;
        db.execute_unprepared(RELEVES_DEPENSE_SQL).await?;
        db.execute_unprepared(COMPTES_BANCAIRES_SQL).await?;

        // ============================================================
        // PART 3: ENGINE-OWNED TABLES
        // ============================================================
        db.execute_unprepared(ETATS_SQL).await?;
        db.execute_unprepared(ETAT_AUDITS_SQL).await?;
        db.execute_unprepared(CONFIGURATION_ETATS_SQL).await?;

        // ============================================================
        // PART 4: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_CONFIGURATION_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const SERVICES_SQL: &str = r"
CREATE TABLE services (
    id UUID PRIMARY KEY,
    nom TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE
);
";

const NATURES_ECONOMIQUES_SQL: &str = r"
CREATE TABLE natures_economiques (
    id UUID PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    libelle TEXT NOT NULL
);
";

const BANQUES_SQL: &str = r"
CREATE TABLE banques (
    id UUID PRIMARY KEY,
    nom TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE
);
";

const DEMANDES_PAIEMENT_SQL: &str = r"
CREATE TABLE demandes_paiement (
    id UUID PRIMARY KEY,
    numero TEXT NOT NULL UNIQUE,
    beneficiaire TEXT NOT NULL,
    motif TEXT NOT NULL,
    service_id UUID NOT NULL REFERENCES services(id),
    nature_economique_id UUID REFERENCES natures_economiques(id),
    devise TEXT NOT NULL,
    montant NUMERIC(18, 2) NOT NULL,
    statut TEXT NOT NULL,
    date_soumission DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_demandes_date_soumission ON demandes_paiement(date_soumission);
";

const RECETTES_SQL: &str = r"
CREATE TABLE recettes (
    id UUID PRIMARY KEY,
    numero TEXT NOT NULL UNIQUE,
    libelle TEXT NOT NULL,
    source TEXT NOT NULL,
    service_id UUID NOT NULL REFERENCES services(id),
    banque_id UUID REFERENCES banques(id),
    montant_usd NUMERIC(18, 2),
    montant_cdf NUMERIC(18, 2),
    date_encaissement DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_recettes_date_encaissement ON recettes(date_encaissement);
";

const DEPENSES_SQL: &str = r"
CREATE TABLE depenses (
    id UUID PRIMARY KEY,
    code_depense TEXT NOT NULL,
    libelle TEXT NOT NULL,
    service_id UUID NOT NULL REFERENCES services(id),
    nature_economique_id UUID REFERENCES natures_economiques(id),
    montant_usd NUMERIC(18, 2),
    montant_fc NUMERIC(18, 2),
    statut TEXT NOT NULL,
    date_depense DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_depenses_date_depense ON depenses(date_depense);
";

const PAIEMENTS_SQL: &str = r"
CREATE TABLE paiements (
    id UUID PRIMARY KEY,
    numero TEXT NOT NULL UNIQUE,
    beneficiaire TEXT NOT NULL,
    demande_id UUID REFERENCES demandes_paiement(id),
    service_id UUID REFERENCES services(id),
    banque_id UUID REFERENCES banques(id),
    devise TEXT NOT NULL,
    montant_paye NUMERIC(18, 2) NOT NULL,
    est_partiel BOOLEAN NOT NULL DEFAULT FALSE,
    date_paiement DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_paiements_date_paiement ON paiements(date_paiement);
";

const RELEVES_DEPENSE_SQL: &str = r"
CREATE TABLE releves_depense (
    id UUID PRIMARY KEY,
    service_id UUID NOT NULL REFERENCES services(id),
    libelle TEXT NOT NULL,
    -- anchored to the first day of the statement month
    periode DATE NOT NULL,
    net_usd NUMERIC(18, 2),
    net_cdf NUMERIC(18, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_releves_periode ON releves_depense(periode);
";

const COMPTES_BANCAIRES_SQL: &str = r"
CREATE TABLE comptes_bancaires (
    id UUID PRIMARY KEY,
    banque_id UUID NOT NULL REFERENCES banques(id),
    numero_compte TEXT NOT NULL UNIQUE,
    intitule TEXT NOT NULL,
    devise TEXT NOT NULL,
    solde_courant NUMERIC(18, 2) NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ETATS_SQL: &str = r"
CREATE TABLE etats (
    id UUID PRIMARY KEY,
    kind TEXT NOT NULL,
    titre TEXT NOT NULL,
    description TEXT,
    date_debut DATE NOT NULL,
    date_fin DATE NOT NULL,
    periodicite TEXT NOT NULL,
    filtres JSONB NOT NULL DEFAULT '{}',
    criteres JSONB NOT NULL DEFAULT '{}',
    options JSONB NOT NULL DEFAULT '{}',
    statut TEXT NOT NULL,
    total_usd NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_cdf NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_general NUMERIC(18, 2) NOT NULL DEFAULT 0,
    fichier_pdf TEXT,
    fichier_excel TEXT,
    erreur TEXT,
    cree_par TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_etats_kind ON etats(kind);
CREATE INDEX idx_etats_statut ON etats(statut);
CREATE INDEX idx_etats_created_at ON etats(created_at DESC);
";

const ETAT_AUDITS_SQL: &str = r"
CREATE TABLE etat_audits (
    id UUID PRIMARY KEY,
    etat_id UUID NOT NULL REFERENCES etats(id),
    action TEXT NOT NULL,
    principal TEXT NOT NULL,
    details JSONB NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_etat_audits_etat_id ON etat_audits(etat_id);
";

const CONFIGURATION_ETATS_SQL: &str = r"
CREATE TABLE configuration_etats (
    id UUID PRIMARY KEY,
    kind TEXT NOT NULL UNIQUE,
    titre_defaut TEXT NOT NULL,
    periodicite_defaut TEXT NOT NULL,
    colonnes JSONB NOT NULL DEFAULT '[]',
    filtres_disponibles JSONB NOT NULL DEFAULT '[]',
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SEED_CONFIGURATION_SQL: &str = r#"
INSERT INTO configuration_etats (id, kind, titre_defaut, periodicite_defaut, colonnes, filtres_disponibles) VALUES
    (gen_random_uuid(), 'DEMANDE_PAIEMENT', 'Liste des demandes de paiement', 'MONTHLY',
     '["numero", "date", "beneficiaire", "motif", "devise", "montant"]',
     '["services", "natures_economiques", "statut", "devise", "montants"]'),
    (gen_random_uuid(), 'RECETTE', 'Liste des recettes', 'MONTHLY',
     '["numero", "date", "libelle", "source", "montant_usd", "montant_cdf"]',
     '["services", "banques", "source_recette", "montants"]'),
    (gen_random_uuid(), 'DEPENSE', 'Liste des dépenses', 'MONTHLY',
     '["code", "date", "libelle", "montant_usd", "montant_fc"]',
     '["services", "natures_economiques", "statut", "code_depense", "montants"]'),
    (gen_random_uuid(), 'PAIEMENT', 'Liste des paiements', 'MONTHLY',
     '["numero", "date", "beneficiaire", "devise", "montant_paye"]',
     '["services", "banques", "devise", "montants", "inclure_partiels"]'),
    (gen_random_uuid(), 'RELEVE_DEPENSE', 'Relevés des dépenses', 'MONTHLY',
     '["periode", "libelle", "net_usd", "net_cdf"]',
     '["services", "montants"]'),
    (gen_random_uuid(), 'SOLDE_BANCAIRE', 'Soldes bancaires', 'DAILY',
     '["banque", "numero_compte", "intitule", "devise", "solde_courant"]',
     '["banques", "comptes", "devise"]');
"#;

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS etat_audits;
DROP TABLE IF EXISTS etats;
DROP TABLE IF EXISTS configuration_etats;
DROP TABLE IF EXISTS comptes_bancaires;
DROP TABLE IF EXISTS releves_depense;
DROP TABLE IF EXISTS paiements;
DROP TABLE IF EXISTS depenses;
DROP TABLE IF EXISTS recettes;
DROP TABLE IF EXISTS demandes_paiement;
DROP TABLE IF EXISTS banques;
DROP TABLE IF EXISTS natures_economiques;
DROP TABLE IF EXISTS services;
";
