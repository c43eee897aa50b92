//! Spanish strings.

pub(super) const TABLE: &[(&str, &str)] = &[
    // Navigation
    ("nav.home", "Inicio"),
    ("nav.automedication", "Automedicación"),
    ("nav.interactions", "Interacciones"),
    // Search
    ("search.title", "¿Qué molécula desea tomar?"),
    ("search.placeholder", "Ej: Paracetamol, Ibuprofeno, Dalsy..."),
    ("search.drug_placeholder", "Buscar un medicamento"),
    ("search.add", "Añadir"),
    ("search.loading", "Buscando..."),
    ("search.no_results", "No se encontró ningún medicamento para \"{query}\""),
    ("search.kind.drug", "Medicamento"),
    ("search.kind.substance", "Sustancia"),
    // Selected drugs
    ("list.empty", "Ningún medicamento seleccionado."),
    ("list.remove", "Eliminar"),
    ("list.clear", "Borrar todo"),
    ("list.analyze", "Analizar las interacciones"),
    // Questionnaire
    ("quiz.loading", "Preparando el cuestionario..."),
    ("quiz.about", "Acerca de {molecule}"),
    ("quiz.progress", "{current} / {total}"),
    ("quiz.yes", "Sí"),
    ("quiz.no", "No"),
    ("quiz.continue", "Continuar →"),
    ("quiz.back", "← Volver"),
    ("quiz.age_unit", "años"),
    ("quiz.age_placeholder", "Ej: 35"),
    ("quiz.interrupt.title", "Riesgo importante detectado"),
    (
        "quiz.interrupt.text",
        "Hemos identificado una posible contraindicación. No es necesario continuar con el cuestionario.",
    ),
    ("quiz.analyzing", "Análisis en curso..."),
    ("quiz.submitting", "Calculando el resultado..."),
    ("quiz.legacy.no_questions.title", "No hay preguntas específicas para {molecule}"),
    (
        "quiz.legacy.no_questions.text",
        "Este medicamento no presenta contraindicaciones registradas en nuestra base simplificada.",
    ),
    ("quiz.legacy.acknowledge", "Entendido"),
    // Score
    ("score.risk.low", "RIESGO BAJO"),
    (
        "score.risk.low.text",
        "Puede tomar {molecule} respetando la posología indicada en el prospecto.",
    ),
    ("score.risk.yellow", "PRECAUCIÓN"),
    (
        "score.risk.yellow.text",
        "Puede tomar {molecule}, pero lea atentamente el prospecto y vigile los efectos adversos.",
    ),
    ("score.risk.medium", "RIESGO MODERADO"),
    (
        "score.risk.medium.text",
        "Consulte a su farmacéutico antes de tomar {molecule}.",
    ),
    ("score.risk.high", "CONTRAINDICADO"),
    (
        "score.risk.high.text",
        "No tome {molecule} sin consejo médico. Consulte a su médico o a su farmacéutico.",
    ),
    (
        "score.no_coverage.before",
        "Nuestra base todavía no cubre las contraindicaciones de este medicamento. ",
    ),
    ("score.no_coverage.bold", "Consulte a su farmacéutico."),
    ("score.general_advice", "Consejos generales"),
    ("score.ai_explanation.title", "Explicación personalizada"),
    (
        "score.ai_explanation.disclaimer",
        "Esta explicación ha sido generada por una Inteligencia Artificial y no sustituye la opinión de un profesional de la salud.",
    ),
    (
        "score.unavailable",
        "No se pudo realizar la evaluación. Por precaución, se muestra el resultado más prudente.",
    ),
    ("score.reset", "Hacer otra evaluación"),
    // Interaction analysis
    ("analysis.title", "Resultado del análisis"),
    ("analysis.none", "No se ha detectado ninguna interacción entre sus medicamentos."),
    ("analysis.empty", "Añada al menos un medicamento para iniciar el análisis."),
    (
        "analysis.unavailable",
        "No se pudo realizar el análisis. Compruebe su conexión e inténtelo de nuevo.",
    ),
    ("analysis.severity.red", "Contraindicación"),
    ("analysis.severity.orange", "Asociación desaconsejada"),
    ("analysis.severity.yellow", "Precaución de empleo"),
    ("analysis.severity.green", "A tener en cuenta"),
    ("analysis.conduct", "Conducta a seguir"),
    ("analysis.details", "Detalles técnicos"),
    ("analysis.management", "Manejo"),
];
