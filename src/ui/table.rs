//! Table headers, page messages and row cells per resource.

use super::format::{currency_brl, date_time_br, or_dash};
use crate::model::{Animals, Consultation, Consultations, Secretaries, Veterinarians};
use crate::resource::Resource;
use chrono::FixedOffset;

/// User-facing strings of one list page.
#[derive(Clone, Copy, Debug)]
pub struct PageMessages {
    pub title: &'static str,
    pub empty: &'static str,
    pub load_failed: &'static str,
    pub created: &'static str,
    pub create_failed: &'static str,
    pub updated: &'static str,
    pub update_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
}

/// How a resource is shown in its list page.
pub trait TableView: Resource {
    /// Column headers, one per cell returned by `cells`.
    const HEADERS: &'static [&'static str];
    const MESSAGES: PageMessages;

    fn cells(record: &Self::Record, offset: FixedOffset) -> Vec<String>;
}

/// `"{nome} - {especie} (Dono: {responsavelNome})"`, or the bare id when not embedded.
fn animal_cell(c: &Consultation) -> String {
    match &c.animal {
        Some(a) => format!(
            "{} - {} (Dono: {})",
            a.name,
            or_dash(a.species.as_deref()),
            or_dash(a.owner_name.as_deref())
        ),
        None => c.animal_id.to_string(),
    }
}

fn veterinarian_cell(c: &Consultation) -> String {
    match &c.veterinarian {
        Some(v) => format!("{} - {}", v.name, or_dash(v.specialty.as_deref())),
        None => c.veterinarian_id.to_string(),
    }
}

impl TableView for Consultations {
    const HEADERS: &'static [&'static str] = &["Data/Hora", "Animal", "Veterinário", "Status", "Valor", "Motivo"];
    const MESSAGES: PageMessages = PageMessages {
        title: "Lista de Consultas",
        empty: "Nenhuma consulta encontrada.",
        load_failed: "Erro ao buscar consultas.",
        created: "Consulta criada com sucesso.",
        create_failed: "Erro ao criar consulta.",
        updated: "Consulta atualizada com sucesso.",
        update_failed: "Erro ao atualizar consulta.",
        deleted: "Consulta removida com sucesso.",
        delete_failed: "Erro ao deletar consulta.",
    };

    fn cells(c: &Consultation, offset: FixedOffset) -> Vec<String> {
        vec![
            date_time_br(&c.scheduled_at, offset),
            animal_cell(c),
            veterinarian_cell(c),
            c.status.to_string(),
            currency_brl(c.value),
            or_dash(c.reason.as_deref()).to_string(),
        ]
    }
}

impl TableView for Veterinarians {
    const HEADERS: &'static [&'static str] = &["Nome", "Especialidade", "CRMV"];
    const MESSAGES: PageMessages = PageMessages {
        title: "Lista de Veterinários",
        empty: "Nenhum veterinário encontrado.",
        load_failed: "Erro ao buscar veterinários.",
        created: "Veterinário criado com sucesso.",
        create_failed: "Erro ao criar veterinário.",
        updated: "Veterinário atualizado com sucesso.",
        update_failed: "Erro ao atualizar veterinário.",
        deleted: "Veterinário removido com sucesso.",
        delete_failed: "Erro ao deletar veterinário.",
    };

    fn cells(v: &Self::Record, _offset: FixedOffset) -> Vec<String> {
        vec![
            v.name.clone(),
            or_dash(v.specialty.as_deref()).to_string(),
            or_dash(v.license.as_deref()).to_string(),
        ]
    }
}

impl TableView for Animals {
    const HEADERS: &'static [&'static str] = &["Nome", "Espécie", "Responsável", "E-mail do responsável"];
    const MESSAGES: PageMessages = PageMessages {
        title: "Lista de Animais",
        empty: "Nenhum animal encontrado.",
        load_failed: "Erro ao buscar animais.",
        created: "Animal criado com sucesso.",
        create_failed: "Erro ao criar animal.",
        updated: "Animal atualizado com sucesso.",
        update_failed: "Erro ao atualizar animal.",
        deleted: "Animal removido com sucesso.",
        delete_failed: "Erro ao deletar animal.",
    };

    fn cells(a: &Self::Record, _offset: FixedOffset) -> Vec<String> {
        vec![
            a.name.clone(),
            or_dash(a.species.as_deref()).to_string(),
            or_dash(a.owner_name.as_deref()).to_string(),
            or_dash(a.owner_email.as_deref()).to_string(),
        ]
    }
}

impl TableView for Secretaries {
    const HEADERS: &'static [&'static str] = &["Nome", "E-mail", "Telefone"];
    const MESSAGES: PageMessages = PageMessages {
        title: "Lista de Secretários",
        empty: "Nenhum secretário encontrado.",
        load_failed: "Erro ao buscar secretários.",
        created: "Secretário criado com sucesso.",
        create_failed: "Erro ao criar secretário.",
        updated: "Secretário atualizado com sucesso.",
        update_failed: "Erro ao atualizar secretário.",
        deleted: "Secretário removido com sucesso.",
        delete_failed: "Erro ao deletar secretário.",
    };

    fn cells(s: &Self::Record, _offset: FixedOffset) -> Vec<String> {
        vec![
            s.name.clone(),
            or_dash(s.email.as_deref()).to_string(),
            or_dash(s.phone.as_deref()).to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Animal, ConsultationStatus, Veterinarian};
    use crate::ui::format::clinic_offset;
    use chrono::{DateTime, Utc};

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn consultation() -> Consultation {
        Consultation {
            id: 1,
            scheduled_at: at("2024-05-01T10:00:00Z"),
            reason: None,
            status: ConsultationStatus::InProgress,
            notes: None,
            value: Some(1234.5),
            animal_id: 3,
            veterinarian_id: 4,
            animal: None,
            veterinarian: None,
            created_at: at("2024-04-01T00:00:00Z"),
            updated_at: at("2024-04-01T00:00:00Z"),
        }
    }

    #[test]
    fn consultation_without_embeds_shows_ids() {
        let cells = Consultations::cells(&consultation(), clinic_offset());
        assert_eq!(cells.len(), Consultations::HEADERS.len());
        assert_eq!(
            cells,
            vec!["01/05/2024, 07:00", "3", "4", "Em andamento", "R$\u{a0}1.234,50", "-"]
        );
    }

    #[test]
    fn consultation_embeds_are_described() {
        let mut c = consultation();
        c.animal = Some(Animal {
            id: 3,
            name: "Rex".into(),
            species: Some("dog".into()),
            owner_name: None,
            owner_email: None,
            created_at: c.created_at,
            updated_at: c.updated_at,
        });
        c.veterinarian = Some(Veterinarian {
            id: 4,
            name: "Dra. Ana".into(),
            specialty: Some("Clínica geral".into()),
            license: None,
            created_at: c.created_at,
            updated_at: c.updated_at,
        });
        let cells = Consultations::cells(&c, clinic_offset());
        assert_eq!(cells[1], "Rex - dog (Dono: -)");
        assert_eq!(cells[2], "Dra. Ana - Clínica geral");
    }

    #[test]
    fn header_counts_match_cells() {
        let now = Utc::now();
        let vet = Veterinarian {
            id: 1,
            name: "Dr. Bruno".into(),
            specialty: None,
            license: Some("SP-1234".into()),
            created_at: now,
            updated_at: now,
        };
        let cells = Veterinarians::cells(&vet, clinic_offset());
        assert_eq!(cells.len(), Veterinarians::HEADERS.len());
        assert_eq!(cells, vec!["Dr. Bruno", "-", "SP-1234"]);
    }
}
