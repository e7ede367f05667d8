//! Starter questions used when the store has never held a question list.

use chrono::{DateTime, Duration, Utc};

use prep_core::model::{
    Confidence, LeadershipPrinciple, Question, QuestionDraft, QuestionId, Starl,
};

fn starter_drafts() -> Vec<QuestionDraft> {
    vec![
        QuestionDraft::principle(
            "Tell me about a time you went above and beyond for a customer.",
            LeadershipPrinciple::CustomerObsession,
            Starl::new(
                "A regular customer reported that a recurring order kept arriving late.",
                "Find the cause and make sure the next delivery arrived on time.",
                "I traced the order through each hand-off and found a mislabelled route. I fixed the label and called the customer with an update.",
                "Every following delivery arrived on time and the customer renewed their contract.",
                "Following a complaint end to end beats patching the last step.",
            ),
        )
        .flagged(true)
        .confidence(Some(Confidence::Medium)),
        QuestionDraft::principle(
            "Describe a time you had to make a decision with incomplete data.",
            LeadershipPrinciple::BiasForAction,
            Starl::new(
                "A supplier outage hit two hours before a shipping cut-off.",
                "Decide whether to reroute orders without full stock visibility.",
                "I picked the reversible option, rerouted half the volume, and set a checkpoint after thirty minutes.",
                "We met the cut-off for all priority orders.",
                "Reversible decisions should be made quickly and revisited.",
            ),
        )
        .mastered(true)
        .flagged(true)
        .confidence(Some(Confidence::High)),
        QuestionDraft::principle(
            "Tell me about a time you took on a problem outside your direct responsibilities.",
            LeadershipPrinciple::Ownership,
            Starl::new(
                "The loading dock was overloaded at the end of every shift.",
                "Smooth the flow even though the dock was not my team.",
                "I set up a short daily check-in with the upstream leads and staggered the release of work.",
                "End-of-shift backlog dropped and late trucks became rare.",
                "Ownership covers the whole process, not only my own area.",
            ),
        )
        .confidence(Some(Confidence::Low)),
        QuestionDraft::principle(
            "Describe a time you delivered a result under a tight deadline.",
            LeadershipPrinciple::DeliverResults,
            Starl::new(
                "A product launch was moved forward by a week.",
                "Ship the core features on the new date without cutting quality checks.",
                "I split the scope into must-have and later, and ran daily reviews of the must-have list.",
                "We launched on the new date with no critical defects.",
                "",
            ),
        ),
        QuestionDraft::principle(
            "Tell me about a time you changed a process because of customer feedback.",
            LeadershipPrinciple::CustomerObsession,
            Starl::new(
                "Customers kept asking support for the same delivery status.",
                "Cut the repeat calls without adding support staff.",
                "I grouped a month of tickets by question and worked with the web team on a status page for the top three.",
                "Status calls fell by about a third in the next quarter.",
                "The ticket queue is a product backlog if you read it that way.",
            ),
        ),
        QuestionDraft::principle(
            "Describe a time you fixed something nobody asked you to fix.",
            LeadershipPrinciple::Ownership,
            Starl::new(
                "A nightly report failed silently about once a week.",
                "Make failures visible even though the report belonged to another team.",
                "I added an alert on the missing output and handed the owning team a short runbook.",
                "Failures were caught the same morning instead of days later.",
                "",
            ),
        ),
        QuestionDraft::principle(
            "Tell me about a goal you missed and what you did next.",
            LeadershipPrinciple::DeliverResults,
            Starl::new(
                "My team missed a quarterly throughput target by ten percent.",
                "Explain the gap and recover it the following quarter.",
                "I broke the miss down by cause, fixed the two largest, and reported progress every week.",
                "We beat the next quarter's target.",
                "Report a miss early with a plan attached.",
            ),
        )
        .flagged(true),
        QuestionDraft::freestyle(
            "Why do you want this role?",
            "Motivation & Fit",
            "I enjoy leading teams through operational problems and want the scope to fix them for good.",
        )
        .mastered(true)
        .flagged(true)
        .confidence(Some(Confidence::Medium)),
        QuestionDraft::freestyle(
            "What would you do differently in your first ninety days?",
            "Self-Reflection & Growth",
            "Spend more time listening before changing processes, and agree on measures of success early.",
        )
        .confidence(Some(Confidence::High)),
        QuestionDraft::freestyle(
            "How does this role differ from your current one?",
            "Role Understanding",
            "",
        ),
    ]
}

/// Build the starter list, newest first, relative to `now`.
#[must_use]
pub fn starter_questions(now: DateTime<Utc>) -> Vec<Question> {
    starter_drafts()
        .into_iter()
        .filter_map(|draft| draft.validate().ok())
        .zip(0_i64..)
        .map(|(validated, age_hours)| {
            validated.assign_id(QuestionId::generate(), now - Duration::hours(age_hours))
        })
        .collect()
}
