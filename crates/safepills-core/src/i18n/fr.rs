//! French strings (default language).

pub(super) const TABLE: &[(&str, &str)] = &[
    // Navigation
    ("nav.home", "Accueil"),
    ("nav.automedication", "Automédication"),
    ("nav.interactions", "Interactions"),
    // Search
    ("search.title", "Quelle molécule souhaitez-vous prendre ?"),
    ("search.placeholder", "Ex: Paracétamol, Ibuprofène, Doliprane..."),
    ("search.drug_placeholder", "Rechercher un médicament"),
    ("search.add", "Ajouter"),
    ("search.loading", "Recherche..."),
    ("search.no_results", "Aucun médicament trouvé pour \"{query}\""),
    ("search.kind.drug", "Médicament"),
    ("search.kind.substance", "Substance"),
    // Selected drugs
    ("list.empty", "Aucun médicament sélectionné."),
    ("list.remove", "Supprimer"),
    ("list.clear", "Tout effacer"),
    ("list.analyze", "Analyser les interactions"),
    // Questionnaire
    ("quiz.loading", "Préparation du questionnaire..."),
    ("quiz.about", "À propos de {molecule}"),
    ("quiz.progress", "{current} / {total}"),
    ("quiz.yes", "Oui"),
    ("quiz.no", "Non"),
    ("quiz.continue", "Continuer →"),
    ("quiz.back", "← Retour"),
    ("quiz.age_unit", "ans"),
    ("quiz.age_placeholder", "Ex: 35"),
    ("quiz.interrupt.title", "Risque important détecté"),
    (
        "quiz.interrupt.text",
        "Nous avons identifié une contre-indication potentielle. Il n'est pas nécessaire de poursuivre le questionnaire.",
    ),
    ("quiz.analyzing", "Analyse en cours..."),
    ("quiz.submitting", "Calcul du résultat..."),
    ("quiz.legacy.no_questions.title", "Pas de questions spécifiques pour {molecule}"),
    (
        "quiz.legacy.no_questions.text",
        "Ce médicament ne présente pas de contre-indications enregistrées dans notre base simplifiée.",
    ),
    ("quiz.legacy.acknowledge", "C'est noté"),
    // Score
    ("score.risk.low", "FAIBLE RISQUE"),
    (
        "score.risk.low.text",
        "Vous pouvez prendre {molecule} en respectant la posologie indiquée sur la notice.",
    ),
    ("score.risk.yellow", "VIGILANCE"),
    (
        "score.risk.yellow.text",
        "Vous pouvez prendre {molecule}, mais lisez attentivement la notice et surveillez les effets indésirables.",
    ),
    ("score.risk.medium", "RISQUE MODÉRÉ"),
    (
        "score.risk.medium.text",
        "Demandez conseil à votre pharmacien avant de prendre {molecule}.",
    ),
    ("score.risk.high", "CONTRE-INDIQUÉ"),
    (
        "score.risk.high.text",
        "Ne prenez pas {molecule} sans avis médical. Consultez votre médecin ou votre pharmacien.",
    ),
    (
        "score.no_coverage.before",
        "Notre base ne couvre pas encore les contre-indications de ce médicament. ",
    ),
    ("score.no_coverage.bold", "Demandez conseil à votre pharmacien."),
    ("score.general_advice", "Conseils généraux"),
    ("score.ai_explanation.title", "Explication personnalisée"),
    (
        "score.ai_explanation.disclaimer",
        "Cette explication a été générée par une Intelligence Artificielle et ne remplace pas l'avis d'un professionnel de santé.",
    ),
    (
        "score.unavailable",
        "L'évaluation n'a pas pu être réalisée. Par précaution, le résultat le plus prudent est affiché.",
    ),
    ("score.reset", "Faire une autre évaluation"),
    // Interaction analysis
    ("analysis.title", "Résultat de l'analyse"),
    ("analysis.none", "Aucune interaction détectée entre vos médicaments."),
    ("analysis.empty", "Ajoutez au moins un médicament pour lancer l'analyse."),
    (
        "analysis.unavailable",
        "L'analyse n'a pas pu être réalisée. Vérifiez votre connexion et réessayez.",
    ),
    ("analysis.severity.red", "Contre-indication"),
    ("analysis.severity.orange", "Association déconseillée"),
    ("analysis.severity.yellow", "Précaution d'emploi"),
    ("analysis.severity.green", "À prendre en compte"),
    ("analysis.conduct", "Conduite à tenir"),
    ("analysis.details", "Détails techniques"),
    ("analysis.management", "Prise en charge"),
];
