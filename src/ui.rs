use crate::models::Habit;

/// Renders the calendar page with `habits` embedded as JSON for the page script.
pub fn render_index(habits: &[Habit]) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_string(habits)?.replace('<', "\\u003c");
    Ok(INDEX_HTML
        .replace("{{HABIT_COUNT}}", &habits.len().to_string())
        .replace("{{HABITS_JSON}}", &payload))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Calendar</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
      font-size: 1rem;
    }

    .habits {
      display: grid;
      gap: 20px;
    }

    .habit {
      background: white;
      border-radius: 20px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 12px;
    }

    .habit-head {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .habit-head h2 {
      margin: 0;
      font-size: 1.3rem;
    }

    .goal {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
      transition: transform 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    .calendar {
      display: grid;
      grid-auto-flow: column;
      grid-template-rows: repeat(7, 12px);
      grid-auto-columns: 12px;
      gap: 3px;
      overflow-x: auto;
      padding-bottom: 4px;
    }

    .day {
      border-radius: 3px;
      background: rgba(47, 72, 88, 0.08);
    }

    .day[data-level="1"] { background: #ffd3c8; }
    .day[data-level="2"] { background: #ffa48f; }
    .day[data-level="3"] { background: #ff8466; }
    .day[data-level="4"] { background: var(--accent); }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habit Calendar</h1>
      <p class="subtitle">{{HABIT_COUNT}} habits, logged progress since the start of the year.</p>
    </header>
    <section class="habits" id="habits"></section>
    <div class="status" id="status"></div>
    <p class="hint">Each square is one day; darker means closer to the daily goal.</p>
  </main>
  <script>
    const habits = {{HABITS_JSON}};
    const habitsEl = document.getElementById('habits');
    const statusEl = document.getElementById('status');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const pad = (value) => String(value).padStart(2, '0');

    const dayKey = (date) => `${date.getFullYear()}-${pad(date.getMonth() + 1)}-${pad(date.getDate())}`;

    const todayTarget = () => {
      const now = new Date();
      const offset = -now.getTimezoneOffset();
      const sign = offset >= 0 ? '+' : '-';
      const abs = Math.abs(offset);
      return `${dayKey(now)}T00:00:00${sign}${pad(Math.floor(abs / 60))}:${pad(abs % 60)}`;
    };

    const level = (value, goal) => {
      if (!value) {
        return 0;
      }
      const ratio = goal > 0 ? value / goal : 1;
      return Math.max(1, Math.min(4, Math.ceil(ratio * 4)));
    };

    const renderCalendar = (el, totals, goal) => {
      const byDay = {};
      Object.entries(totals).forEach(([seconds, value]) => {
        const key = dayKey(new Date(Number(seconds) * 1000));
        byDay[key] = (byDay[key] || 0) + value;
      });
      const now = new Date();
      const start = new Date(now.getFullYear(), 0, 1);
      const end = new Date(now.getFullYear(), now.getMonth() + 1, 0);
      el.innerHTML = '';
      for (let i = 0; i < start.getDay(); i += 1) {
        el.appendChild(document.createElement('span'));
      }
      for (let day = new Date(start); day <= end; day.setDate(day.getDate() + 1)) {
        const cell = document.createElement('span');
        const key = dayKey(day);
        const value = byDay[key] || 0;
        cell.className = 'day';
        cell.dataset.level = String(level(value, goal));
        cell.title = `${key}: ${value}`;
        el.appendChild(cell);
      }
    };

    const loadLogs = async (habit, calendarEl) => {
      const response = await fetch(`/logs?habit_id=${encodeURIComponent(habit.id)}`);
      if (!response.ok) {
        throw new Error(await response.text());
      }
      renderCalendar(calendarEl, await response.json(), habit.goal ? habit.goal.value : 1);
    };

    const logUp = async (habit, calendarEl) => {
      const params = new URLSearchParams({
        habit_id: habit.id,
        target_date: todayTarget(),
        unit: habit.goal ? habit.goal.unit_type : ''
      });
      const response = await fetch(`/logs/up?${params}`);
      if (!response.ok) {
        throw new Error(await response.text());
      }
      await loadLogs(habit, calendarEl);
    };

    habits
      .filter((habit) => !habit.is_archived)
      .forEach((habit) => {
        const card = document.createElement('article');
        card.className = 'habit';

        const head = document.createElement('div');
        head.className = 'habit-head';
        const title = document.createElement('div');
        const name = document.createElement('h2');
        name.textContent = habit.name;
        const goal = document.createElement('span');
        goal.className = 'goal';
        goal.textContent = habit.goal
          ? `${habit.goal.value} ${habit.goal.unit_type} / ${habit.goal.periodicity}`
          : 'no goal';
        title.append(name, goal);

        const button = document.createElement('button');
        button.type = 'button';
        button.textContent = '+1 today';
        head.append(title, button);

        const calendar = document.createElement('div');
        calendar.className = 'calendar';
        card.append(head, calendar);
        habitsEl.appendChild(card);

        button.addEventListener('click', () => {
          button.disabled = true;
          logUp(habit, calendar)
            .then(() => setStatus(`Logged ${habit.name}.`, 'ok'))
            .catch((err) => setStatus(`Could not log ${habit.name}: ${err.message}`, 'error'))
            .finally(() => {
              button.disabled = false;
            });
        });

        loadLogs(habit, calendar).catch((err) => setStatus(`Could not load ${habit.name}: ${err.message}`, 'error'));
      });

    if (!habits.length) {
      setStatus('No habits yet.', '');
    }
  </script>
</body>
</html>
"#;
