// src/services/report_service.rs

use futures::future::join_all;
use std::{collections::BTreeSet, sync::Arc};

use crate::{
    common::error::AppError,
    db::{document_store::SERVER_TIMESTAMP, ObjectStorage, ReportRepository},
    models::{
        auth::SessionUser,
        form::Section,
        report::{
            AnswerTally, AnswerTallyExcludingNa, NewReport, PendingImage, Report, ReportDetail, ReportLine,
            SaveReportPayload, CONFORME, NECESITA_MEJORA, NO_APLICA, NO_CONFORME,
        },
    },
    services::tenancy_service::TenancyService,
};

// ---
// Regras puras da montagem do reporte
// ---

pub fn flatten(nested: &[Vec<String>]) -> Vec<String> {
    nested.iter().flatten().cloned().collect()
}

/// Respostas fora das quatro categorias entram no total mas em nenhum contador.
pub fn tally(answers: &[String]) -> AnswerTally {
    let mut tally = AnswerTally::default();
    for answer in answers {
        match answer.as_str() {
            CONFORME => tally.conforme += 1,
            NO_CONFORME => tally.no_conforme += 1,
            NECESITA_MEJORA => tally.necesita_mejora += 1,
            NO_APLICA => tally.no_aplica += 1,
            _ => {}
        }
    }
    tally
}

pub fn question_count(sections: &[Section]) -> usize {
    sections.iter().map(|s| s.preguntas.len()).sum()
}

pub fn all_questions_answered(answer_count: usize, sections: &[Section]) -> bool {
    answer_count == question_count(sections)
}

/// Uma linha por pergunta (na ordem achatada das seções). Índices ausentes viram "no disponible".
pub fn printable_lines(report: &Report) -> Vec<ReportLine> {
    let questions: Vec<(&str, &str)> = report
        .secciones
        .iter()
        .flat_map(|s| s.preguntas.iter().map(move |p| (s.nombre.as_str(), p.as_str())))
        .collect();
    let rows = questions.len().max(report.respuestas.len());

    (0..rows)
        .map(|idx| {
            let (seccion, pregunta) = questions
                .get(idx)
                .copied()
                .unwrap_or(("Sección no disponible", "Pregunta no disponible"));
            ReportLine {
                formulario: report.formulario.nombre.clone(),
                seccion: seccion.to_string(),
                pregunta: pregunta.to_string(),
                respuesta: report
                    .respuestas
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| "Respuesta no disponible".to_string()),
                comentario: report
                    .comentarios
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| "Comentario no disponible".to_string()),
            }
        })
        .collect()
}

/// Mais recente primeiro; reportes sem `fechaGuardado` ficam no fim.
pub fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by(|a, b| match (&a.fecha_guardado, &b.fecha_guardado) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
    storage: Arc<dyn ObjectStorage>,
    tenancy: TenancyService,
}

impl ReportService {
    pub fn new(reports: ReportRepository, storage: Arc<dyn ObjectStorage>, tenancy: TenancyService) -> Self {
        Self { reports, storage, tenancy }
    }

    // Envia as imagens em paralelo. Uma falha só descarta aquela imagem.
    async fn upload_images(&self, images: Vec<PendingImage>) -> Vec<String> {
        let uploads = images.into_iter().map(|image| async move {
            let path = format!("imagenes/{}", image.file_name);
            self.storage
                .upload(&path, image.bytes, image.content_type.as_deref())
                .await?;
            self.storage.download_url(&path).await
        });

        join_all(uploads)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::error!("Erro ao subir imagem do reporte: {}", e);
                    None
                }
            })
            .collect()
    }

    pub async fn save(
        &self,
        user: &SessionUser,
        payload: SaveReportPayload,
        images: Vec<PendingImage>,
    ) -> Result<Report, AppError> {
        let respuestas = flatten(&payload.respuestas);
        if respuestas.is_empty() {
            return Err(AppError::EmptyReport);
        }
        let comentarios = flatten(&payload.comentarios);

        let estadisticas = tally(&respuestas);
        let estadisticas_sin_no_aplica = AnswerTallyExcludingNa::from(&estadisticas);
        let total_respuestas = respuestas.len();
        let todas_preguntas_contestadas = all_questions_answered(total_respuestas, &payload.secciones);

        let imagenes = self.upload_images(images).await;

        let report = self
            .reports
            .create(&NewReport {
                empresa: &payload.empresa,
                sucursal: &payload.sucursal,
                formulario: &payload.formulario,
                respuestas,
                comentarios,
                imagenes,
                secciones: &payload.secciones,
                estadisticas,
                estadisticas_sin_no_aplica,
                total_respuestas,
                todas_preguntas_contestadas,
                usuario_id: &user.uid,
                cliente_admin_id: user.tenant_admin_id(),
                fecha_guardado: SERVER_TIMESTAMP,
            })
            .await?;

        tracing::info!(
            "📝 Reporte {} salvo por {} ({} respostas, {} imagens)",
            report.id,
            user.uid,
            report.total_respuestas,
            report.imagenes.len()
        );
        Ok(report)
    }

    pub async fn list(&self, user: &SessionUser, empresa: Option<&str>) -> Result<Vec<Report>, AppError> {
        let mut reports = self.tenancy.visible_reports(user).await?;
        if let Some(nombre) = empresa {
            reports.retain(|r| r.empresa.nombre == nombre);
        }
        sort_newest_first(&mut reports);
        Ok(reports)
    }

    /// Nomes distintos de empresa entre os reportes visíveis, em ordem alfabética.
    pub async fn company_names(&self, user: &SessionUser) -> Result<Vec<String>, AppError> {
        let reports = self.tenancy.visible_reports(user).await?;
        let names: BTreeSet<String> = reports.into_iter().map(|r| r.empresa.nombre).collect();
        Ok(names.into_iter().collect())
    }

    pub async fn detail(&self, user: &SessionUser, id: &str) -> Result<ReportDetail, AppError> {
        let report = self
            .reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DocumentNotFound { collection: "reportes", id: id.to_string() })?;

        if !self.tenancy.can_view_report(user, &report).await? {
            return Err(AppError::AccessDenied);
        }

        let lineas = printable_lines(&report);
        Ok(ReportDetail { reporte: report, lineas })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{
            document_store::DocumentStore, object_storage::MemoryObjectStorage, AuditRepository, CompanyRepository,
            FormRepository, MemoryDocumentStore, UserRepository,
        },
        models::{
            auth::{Permissions, Role},
            report::{ReportCompany, ReportForm},
        },
    };
    use async_trait::async_trait;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn session(uid: &str, role: Role, admin: Option<&str>) -> SessionUser {
        SessionUser {
            uid: uid.into(),
            email: format!("{uid}@example.com"),
            display_name: None,
            role,
            cliente_admin_id: admin.map(String::from),
            permisos: Permissions::default(),
        }
    }

    fn sections() -> Vec<Section> {
        vec![
            Section { nombre: "Orden".into(), preguntas: strings(&["¿Piso limpio?", "¿Salidas libres?"]) },
            Section { nombre: "EPP".into(), preguntas: strings(&["¿Casco?"]) },
        ]
    }

    fn payload(empresa: &str, respuestas: Vec<Vec<String>>) -> SaveReportPayload {
        SaveReportPayload {
            empresa: ReportCompany { id: Some("e1".into()), nombre: empresa.into(), logo: None },
            sucursal: "Planta Norte".into(),
            formulario: ReportForm { id: "f1".into(), nombre: "General".into() },
            respuestas,
            comentarios: vec![strings(&["ok", ""]), strings(&["falta"])],
            secciones: sections(),
        }
    }

    fn image(name: &str) -> PendingImage {
        PendingImage { file_name: name.into(), content_type: Some("image/png".into()), bytes: vec![1, 2, 3] }
    }

    fn service_with(storage: Arc<dyn ObjectStorage>) -> ReportService {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let reports = ReportRepository::new(store.clone());
        let tenancy = TenancyService::new(
            UserRepository::new(store.clone()),
            CompanyRepository::new(store.clone()),
            FormRepository::new(store.clone()),
            AuditRepository::new(store.clone()),
            reports.clone(),
        );
        ReportService::new(reports, storage, tenancy)
    }

    // Storage que recusa um nome específico
    struct FlakyStorage {
        inner: MemoryObjectStorage,
        reject: &'static str,
    }

    #[async_trait]
    impl ObjectStorage for FlakyStorage {
        async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<(), AppError> {
            if path.ends_with(self.reject) {
                return Err(AppError::StorageError(std::io::Error::other("upload recusado")));
            }
            self.inner.upload(path, bytes, content_type).await
        }

        async fn download_url(&self, path: &str) -> Result<String, AppError> {
            self.inner.download_url(path).await
        }
    }

    #[test]
    fn tally_counts_each_category() {
        let tally = tally(&strings(&["Conforme", "Conforme", "No conforme", "No aplica"]));
        assert_eq!(tally, AnswerTally { conforme: 2, no_conforme: 1, necesita_mejora: 0, no_aplica: 1 });

        let without_na = AnswerTallyExcludingNa::from(&tally);
        let json = serde_json::to_value(&without_na).unwrap();
        assert_eq!(json, serde_json::json!({ "Conforme": 2, "No conforme": 1, "Necesita mejora": 0 }));
    }

    #[test]
    fn unknown_answers_count_in_no_category() {
        let answers = strings(&["Conforme", "Tal vez"]);
        let tally = tally(&answers);
        assert_eq!(tally.conforme + tally.no_conforme + tally.necesita_mejora + tally.no_aplica, 1);
    }

    #[test]
    fn completeness_compares_against_total_questions() {
        assert!(all_questions_answered(3, &sections()));
        assert!(!all_questions_answered(2, &sections()));
    }

    #[test]
    fn printable_lines_fill_missing_indexes() {
        let report = Report {
            id: "r1".into(),
            empresa: ReportCompany { id: None, nombre: "Acme".into(), logo: None },
            sucursal: "Centro".into(),
            formulario: ReportForm { id: "f1".into(), nombre: "General".into() },
            respuestas: strings(&["Conforme", "No conforme"]),
            comentarios: strings(&["bien"]),
            imagenes: Vec::new(),
            secciones: sections(),
            estadisticas: AnswerTally::default(),
            estadisticas_sin_no_aplica: AnswerTallyExcludingNa::default(),
            total_respuestas: 2,
            todas_preguntas_contestadas: false,
            usuario_id: None,
            cliente_admin_id: None,
            fecha_guardado: None,
        };

        let lines = printable_lines(&report);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].seccion, "Orden");
        assert_eq!(lines[0].comentario, "bien");
        assert_eq!(lines[1].comentario, "Comentario no disponible");
        assert_eq!(lines[2].seccion, "EPP");
        assert_eq!(lines[2].respuesta, "Respuesta no disponible");
    }

    #[tokio::test]
    async fn save_builds_statistics_and_uploads_images() {
        let storage = Arc::new(MemoryObjectStorage::new());
        let service = service_with(storage.clone());
        let user = session("op1", Role::Operario, Some("admin"));

        let report = service
            .save(
                &user,
                payload("Acme", vec![strings(&["Conforme", "No aplica"]), strings(&["Necesita mejora"])]),
                vec![image("a.png"), image("b.png")],
            )
            .await
            .unwrap();

        assert_eq!(report.total_respuestas, 3);
        assert!(report.todas_preguntas_contestadas);
        assert_eq!(report.estadisticas.necesita_mejora, 1);
        assert_eq!(report.comentarios, strings(&["ok", "", "falta"]));
        assert_eq!(report.usuario_id.as_deref(), Some("op1"));
        assert_eq!(report.cliente_admin_id.as_deref(), Some("admin"));
        assert!(report.fecha_guardado.is_some());
        assert_eq!(report.imagenes.len(), 2);
        assert!(storage.contains("imagenes/a.png").await);
        assert!(storage.contains("imagenes/b.png").await);
    }

    #[tokio::test]
    async fn failed_upload_is_dropped_not_fatal() {
        let storage = Arc::new(FlakyStorage { inner: MemoryObjectStorage::new(), reject: "bad.png" });
        let service = service_with(storage);
        let user = session("T", Role::Max, None);

        let report = service
            .save(&user, payload("Acme", vec![strings(&["Conforme"])]), vec![image("ok.png"), image("bad.png")])
            .await
            .unwrap();

        assert_eq!(report.imagenes, vec!["memory://imagenes/ok.png".to_string()]);
        assert!(!report.todas_preguntas_contestadas);
    }

    #[tokio::test]
    async fn empty_answers_are_rejected() {
        let service = service_with(Arc::new(MemoryObjectStorage::new()));
        let user = session("T", Role::Max, None);

        let err = service.save(&user, payload("Acme", vec![Vec::new()]), Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyReport));
    }

    #[tokio::test]
    async fn list_filters_by_company_and_detail_checks_tenant() {
        let service = service_with(Arc::new(MemoryObjectStorage::new()));
        let admin = session("T", Role::Max, None);
        let stranger = session("X", Role::Max, None);

        service.save(&admin, payload("Acme", vec![strings(&["Conforme"])]), Vec::new()).await.unwrap();
        let beta = service
            .save(&admin, payload("Beta", vec![strings(&["No conforme"])]), Vec::new())
            .await
            .unwrap();

        assert_eq!(service.list(&admin, None).await.unwrap().len(), 2);
        let only_beta = service.list(&admin, Some("Beta")).await.unwrap();
        assert_eq!(only_beta.len(), 1);
        assert_eq!(only_beta[0].id, beta.id);
        assert_eq!(service.company_names(&admin).await.unwrap(), strings(&["Acme", "Beta"]));

        assert!(service.list(&stranger, None).await.unwrap().is_empty());
        let denied = service.detail(&stranger, &beta.id).await.unwrap_err();
        assert!(matches!(denied, AppError::AccessDenied));

        let detail = service.detail(&admin, &beta.id).await.unwrap();
        assert_eq!(detail.lineas.len(), 3);
    }

    #[test]
    fn newest_report_comes_first() {
        let mk = |id: &str, fecha: Option<&str>| Report {
            id: id.into(),
            empresa: ReportCompany { id: None, nombre: "Acme".into(), logo: None },
            sucursal: String::new(),
            formulario: ReportForm { id: "f".into(), nombre: "F".into() },
            respuestas: Vec::new(),
            comentarios: Vec::new(),
            imagenes: Vec::new(),
            secciones: Vec::new(),
            estadisticas: AnswerTally::default(),
            estadisticas_sin_no_aplica: AnswerTallyExcludingNa::default(),
            total_respuestas: 0,
            todas_preguntas_contestadas: false,
            usuario_id: None,
            cliente_admin_id: None,
            fecha_guardado: fecha.map(String::from),
        };
        let mut reports = vec![
            mk("old", Some("2025-01-01T00:00:00.000Z")),
            mk("none", None),
            mk("new", Some("2025-03-01T00:00:00.000Z")),
        ];
        sort_newest_first(&mut reports);
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "none"]);
    }
}
